use sea_orm::*;

use crate::domain::DomainError;
use crate::infrastructure::auth::hash_password;
use crate::infrastructure::repositories::counter;
use crate::models::person::{PERSON_TYPE_CUSTOMER, PERSON_TYPE_PERSON};
use crate::models::proposal::DEFAULT_STATUS;
use crate::models::{category, employee, entry, person, proposal, user, work};

/// Make sure `username` can log in and act as an employee.
/// Returns the employee id.
pub async fn ensure_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<i32, DomainError> {
    let now = chrono::Utc::now().to_rfc3339();

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    let user_id = match existing {
        Some(u) => u.id,
        None => {
            let password_hash = hash_password(password).map_err(DomainError::Internal)?;
            let admin = user::ActiveModel {
                username: Set(username.to_owned()),
                first_name: Set(username.to_owned()),
                last_name: Set(None),
                password_hash: Set(password_hash),
                role: Set("admin".to_owned()),
                created_at: Set(now.clone()),
                updated_at: Set(now.clone()),
                ..Default::default()
            }
            .insert(db)
            .await?;
            tracing::info!("Created admin user '{}'", username);
            admin.id
        }
    };

    let employee = employee::Entity::find()
        .filter(employee::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    match employee {
        Some(e) => Ok(e.id),
        None => {
            let e = employee::ActiveModel {
                user_id: Set(user_id),
                occupation: Set(Some("Administrador".to_owned())),
                created_at: Set(now.clone()),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(db)
            .await?;
            Ok(e.id)
        }
    }
}

/// Insert a small, coherent data set. Does nothing if people already exist.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    if person::Entity::find().count(db).await? > 0 {
        tracing::info!("Store already has data, skipping demo seed");
        return Ok(());
    }

    let seller_id = ensure_admin(db, "admin", "admin").await?;
    let now = chrono::Utc::now().to_rfc3339();

    let mut category_ids = Vec::new();
    for (code, description) in [
        ("ELE", "Elétrica"),
        ("HID", "Hidráulica"),
        ("CIV", "Construção civil"),
    ] {
        let c = category::ActiveModel {
            category: Set(code.to_owned()),
            description: Set(Some(description.to_owned())),
            ..Default::default()
        }
        .insert(db)
        .await?;
        category_ids.push(c.id);
    }

    let mut customer_ids = Vec::new();
    for (first_name, company) in [("Ana", "Construtora Sol"), ("Bruno", "Pátio Norte")] {
        let p = insert_person(db, first_name, Some(company), PERSON_TYPE_CUSTOMER, &now).await?;
        customer_ids.push(p);
    }
    let contact_id = insert_person(db, "Carla", None, PERSON_TYPE_PERSON, &now).await?;

    let mut work_ids = Vec::new();
    for (i, (name, address)) in [
        ("Edifício Aurora", "Rua das Flores, 100"),
        ("Galpão Leste", "Av. Industrial, 2500"),
    ]
    .into_iter()
    .enumerate()
    {
        let w = work::ActiveModel {
            name_work: Set(name.to_owned()),
            address: Set(Some(address.to_owned())),
            customer_id: Set(customer_ids[i % customer_ids.len()]),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        work_ids.push(w.id);
    }

    for (i, description) in ["Orçamento de quadro elétrico", "Troca de tubulação"]
        .into_iter()
        .enumerate()
    {
        entry::ActiveModel {
            category_id: Set(category_ids[i]),
            description: Set(Some(description.to_owned())),
            work_id: Set(work_ids[i]),
            person_id: Set(contact_id),
            seller_id: Set(seller_id),
            is_entry: Set(false),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        }
        .insert(db)
        .await?;
    }

    let txn = db.begin().await?;
    let num_prop = counter::allocate_next(&txn).await?;
    proposal::ActiveModel {
        num_prop: Set(num_prop),
        type_prop: Set("O".to_owned()),
        status: Set(DEFAULT_STATUS.to_owned()),
        category_id: Set(category_ids[2]),
        description: Set(Some("Reforma da fachada".to_owned())),
        work_id: Set(work_ids[0]),
        person_id: Set(contact_id),
        employee_id: Set(seller_id),
        seller_id: Set(seller_id),
        entry_id: Set(None),
        price: Set(Some(48_500.0)),
        created_at: Set(now.clone()),
        updated_at: Set(now.clone()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!("Demo data seeded");
    Ok(())
}

async fn insert_person(
    db: &DatabaseConnection,
    first_name: &str,
    company: Option<&str>,
    person_type: &str,
    now: &str,
) -> Result<i32, DbErr> {
    let p = person::ActiveModel {
        first_name: Set(first_name.to_owned()),
        last_name: Set(None),
        company: Set(company.map(str::to_owned)),
        email: Set(None),
        phone: Set(None),
        person_type: Set(person_type.to_owned()),
        created_at: Set(now.to_owned()),
        updated_at: Set(now.to_owned()),
        ..Default::default()
    }
    .insert(db)
    .await?;
    Ok(p.id)
}
