use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

const MIGRATIONS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS employees (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE,
        occupation TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS people (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT,
        company TEXT,
        email TEXT,
        phone TEXT,
        person_type TEXT NOT NULL DEFAULT 'p',
        first_name_folded TEXT NOT NULL DEFAULT '',
        company_folded TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category TEXT NOT NULL UNIQUE,
        description TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS works (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name_work TEXT NOT NULL,
        address TEXT,
        customer_id INTEGER NOT NULL,
        name_work_folded TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (customer_id) REFERENCES people(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS entries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL,
        description TEXT,
        work_id INTEGER NOT NULL,
        person_id INTEGER NOT NULL,
        seller_id INTEGER NOT NULL,
        is_entry BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (category_id) REFERENCES categories(id),
        FOREIGN KEY (work_id) REFERENCES works(id),
        FOREIGN KEY (person_id) REFERENCES people(id),
        FOREIGN KEY (seller_id) REFERENCES employees(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS proposals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        num_prop INTEGER NOT NULL,
        type_prop TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'c',
        category_id INTEGER NOT NULL,
        description TEXT,
        work_id INTEGER NOT NULL,
        person_id INTEGER NOT NULL,
        employee_id INTEGER NOT NULL,
        seller_id INTEGER NOT NULL,
        entry_id INTEGER UNIQUE,
        price REAL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (category_id) REFERENCES categories(id),
        FOREIGN KEY (work_id) REFERENCES works(id),
        FOREIGN KEY (person_id) REFERENCES people(id),
        FOREIGN KEY (employee_id) REFERENCES employees(id),
        FOREIGN KEY (seller_id) REFERENCES employees(id),
        FOREIGN KEY (entry_id) REFERENCES entries(id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS contracts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        proposal_id INTEGER NOT NULL UNIQUE,
        contractor_id INTEGER,
        contract_value REAL,
        is_canceled BOOLEAN NOT NULL DEFAULT 0,
        description TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        FOREIGN KEY (proposal_id) REFERENCES proposals(id),
        FOREIGN KEY (contractor_id) REFERENCES people(id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS num_last_proposal (
        id INTEGER PRIMARY KEY,
        num_last_prop INTEGER NOT NULL DEFAULT 0
    )
    "#,
    // The proposal counter is a single row that must always exist
    r#"
    INSERT OR IGNORE INTO num_last_proposal (id, num_last_prop) VALUES (1, 0)
    "#,
    "CREATE INDEX IF NOT EXISTS idx_people_person_type ON people(person_type)",
    "CREATE INDEX IF NOT EXISTS idx_entries_is_entry ON entries(is_entry)",
    "CREATE INDEX IF NOT EXISTS idx_proposals_status ON proposals(status)",
];

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in MIGRATIONS {
        db.execute(Statement::from_string(
            db.get_database_backend(),
            sql.to_string(),
        ))
        .await?;
    }

    tracing::debug!("Applied {} bootstrap migrations", MIGRATIONS.len());
    Ok(())
}
