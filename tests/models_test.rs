//! Service tests against a live database.
//!
//! These run when `DATABASE_URL` is exported in the environment (a `.env`
//! file is not read) and skip otherwise. Each test applies `schema.sql`,
//! truncates the tables and reseeds them, so point it at a scratch database.
//! The pool holds a single connection, so statements with the same text are
//! reused on the same connection.

use jobly::service::{CompanyService, JobService, UserService};
use jobly::{AppError, ClauseError};
use serde_json::{json, Map, Value};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::error::Error;
use tokio::sync::{Mutex, MutexGuard};

const COST: u32 = 4;

static DB_LOCK: Mutex<()> = Mutex::const_new(());

fn obj(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}

/// A seeded single-connection pool, or `None` when no database is configured.
async fn seeded_pool() -> Result<Option<(PgPool, MutexGuard<'static, ()>)>, Box<dyn Error>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return Ok(None);
    };
    let guard = DB_LOCK.lock().await;
    let pool = PgPoolOptions::new().max_connections(1).connect(&url).await?;
    sqlx::raw_sql(include_str!("../schema.sql")).execute(&pool).await?;
    sqlx::query("TRUNCATE companies, jobs, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await?;
    for n in 1..=3 {
        CompanyService::create(
            &pool,
            &obj(json!({
                "handle": format!("c{}", n),
                "name": format!("C{}", n),
                "description": format!("Desc{}", n),
                "numEmployees": n,
                "logoUrl": format!("http://c{}.img", n)
            })),
        )
        .await?;
    }
    JobService::create(&pool, &obj(json!({"title": "j1", "salary": 1000, "equity": 0.99, "companyHandle": "c1"}))).await?;
    JobService::create(&pool, &obj(json!({"title": "j2", "salary": 2000, "equity": 0, "companyHandle": "c2"}))).await?;
    JobService::create(&pool, &obj(json!({"title": "k3", "salary": null, "equity": null, "companyHandle": "c2"}))).await?;
    for name in ["u1", "u2"] {
        UserService::register(
            &pool,
            &obj(json!({
                "username": name,
                "password": format!("password-{}", name),
                "firstName": "F",
                "lastName": "L",
                "email": format!("{}@email.com", name)
            })),
            COST,
        )
        .await?;
    }
    Ok(Some((pool, guard)))
}

fn handles(companies: &[Value]) -> Vec<&str> {
    companies.iter().filter_map(|c| c["handle"].as_str()).collect()
}

fn titles(jobs: &[Value]) -> Vec<&str> {
    jobs.iter().filter_map(|j| j["title"].as_str()).collect()
}

#[tokio::test]
async fn test_company_filters() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let all = CompanyService::find_all(&pool, &Map::new()).await?;
    assert_eq!(handles(&all), vec!["c1", "c2", "c3"]);
    assert_eq!(all[0]["numEmployees"], 1);
    assert_eq!(all[0]["logoUrl"], "http://c1.img");

    let some = CompanyService::find_all(&pool, &obj(json!({"minEmployees": 2}))).await?;
    assert_eq!(handles(&some), vec!["c2", "c3"]);

    let some = CompanyService::find_all(&pool, &obj(json!({"minEmployees": 1, "maxEmployees": 2}))).await?;
    assert_eq!(handles(&some), vec!["c1", "c2"]);

    let some = CompanyService::find_all(&pool, &obj(json!({"nameLike": "c3"}))).await?;
    assert_eq!(handles(&some), vec!["c3"]);

    let err = CompanyService::find_all(&pool, &obj(json!({"minEmployees": 3, "maxEmployees": 2})))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Clause(ClauseError::InconsistentBounds)));
    Ok(())
}

#[tokio::test]
async fn test_company_crud() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let c1 = CompanyService::get(&pool, "c1").await?;
    assert_eq!(c1["jobs"].as_array().map(Vec::len), Some(1));
    assert_eq!(c1["jobs"][0]["equity"], "0.99");

    let err = CompanyService::create(&pool, &obj(json!({"handle": "c1", "name": "Other", "description": "d"})))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let updated = CompanyService::update(&pool, "c1", &obj(json!({"name": "New", "numEmployees": null, "logoUrl": null}))).await?;
    assert_eq!(
        updated,
        json!({"handle": "c1", "name": "New", "description": "Desc1", "numEmployees": null, "logoUrl": null})
    );

    let err = CompanyService::update(&pool, "nope", &obj(json!({"name": "x"}))).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    CompanyService::remove(&pool, "c1").await?;
    assert!(matches!(CompanyService::get(&pool, "c1").await, Err(AppError::NotFound(_))));
    assert!(matches!(CompanyService::remove(&pool, "c1").await, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_job_filters() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let all = JobService::find_all(&pool, &Map::new()).await?;
    assert_eq!(titles(&all), vec!["j1", "j2", "k3"]);
    assert_eq!(all[0]["companyHandle"], "c1");

    let equity = JobService::find_all(&pool, &obj(json!({"hasEquity": true}))).await?;
    assert_eq!(titles(&equity), vec!["j1"]);

    let no_flag = JobService::find_all(&pool, &obj(json!({"hasEquity": false}))).await?;
    assert_eq!(no_flag.len(), 3);

    let paid = JobService::find_all(&pool, &obj(json!({"minSalary": 1500, "title": "J"}))).await?;
    assert_eq!(titles(&paid), vec!["j2"]);
    Ok(())
}

#[tokio::test]
async fn test_job_crud() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let job = JobService::create(&pool, &obj(json!({"title": "new", "salary": 150000, "equity": 0.5, "companyHandle": "c3"}))).await?;
    let id = job["id"].as_i64().ok_or("no id")?;
    assert_eq!(job["equity"], "0.5");

    let err = JobService::create(&pool, &obj(json!({"title": "x", "companyHandle": "nope"}))).await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let updated = JobService::update(&pool, id, &obj(json!({"title": "renamed", "salary": null}))).await?;
    assert_eq!(updated["title"], "renamed");
    assert_eq!(updated["salary"], Value::Null);
    assert_eq!(updated["companyHandle"], "c3");

    let removed = JobService::remove(&pool, id).await?;
    assert_eq!(removed, json!({"id": id, "title": "renamed"}));
    assert!(matches!(JobService::get(&pool, id).await, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_users() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let user = UserService::authenticate(&pool, "u1", "password-u1").await?;
    assert_eq!(
        user,
        json!({"username": "u1", "firstName": "F", "lastName": "L", "email": "u1@email.com", "isAdmin": false})
    );
    assert!(matches!(
        UserService::authenticate(&pool, "u1", "wrong").await,
        Err(AppError::Unauthorized)
    ));
    assert!(matches!(
        UserService::authenticate(&pool, "nobody", "x").await,
        Err(AppError::Unauthorized)
    ));

    let err = UserService::register(
        &pool,
        &obj(json!({"username": "u1", "password": "password", "firstName": "F", "lastName": "L", "email": "x@y.co"})),
        COST,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    UserService::update(&pool, "u2", &obj(json!({"password": "changed!", "firstName": "New"})), COST).await?;
    let u2 = UserService::authenticate(&pool, "u2", "changed!").await?;
    assert_eq!(u2["firstName"], "New");

    assert_eq!(UserService::find_all(&pool).await?.len(), 2);
    UserService::remove(&pool, "u2").await?;
    assert!(matches!(UserService::get(&pool, "u2").await, Err(AppError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn test_same_statement_rebinds_other_value_types() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    // One text, bound as null, int, then float.
    for (equity, stored) in [(json!(0), json!("0")), (json!(0.5), json!("0.5")), (json!(null), Value::Null)] {
        let job = JobService::create(
            &pool,
            &obj(json!({"title": "rebind", "salary": 10, "equity": equity, "companyHandle": "c3"})),
        )
        .await?;
        assert_eq!(job["equity"], stored);
    }

    for (value, expected) in [(json!(null), Value::Null), (json!(7), json!(7)), (json!(null), Value::Null)] {
        let c = CompanyService::update(&pool, "c1", &obj(json!({"numEmployees": value}))).await?;
        assert_eq!(c["numEmployees"], expected);
    }

    for value in [json!(null), json!("http://new.img"), json!(null)] {
        let c = CompanyService::update(&pool, "c1", &obj(json!({"logoUrl": value.clone()}))).await?;
        assert_eq!(c["logoUrl"], value);
    }

    for (salary, expected) in [(json!(null), Value::Null), (json!(5), json!(5))] {
        let j = JobService::update(&pool, 1, &obj(json!({"salary": salary}))).await?;
        assert_eq!(j["salary"], expected);
    }

    // Same WHERE text with an int bound, then a float bound.
    let by_int = CompanyService::find_all(&pool, &obj(json!({"minEmployees": 2}))).await?;
    assert_eq!(handles(&by_int), vec!["c2", "c3"]);
    let by_float = CompanyService::find_all(&pool, &obj(json!({"minEmployees": "2.5"}))).await?;
    assert_eq!(handles(&by_float), vec!["c3"]);
    Ok(())
}

#[tokio::test]
async fn test_bad_values_are_client_errors() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let err = CompanyService::create(&pool, &obj(json!({"handle": "Upper", "name": "Upper", "description": "d"})))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{:?}", err);

    let err = JobService::create(
        &pool,
        &obj(json!({"title": "rich", "salary": 3000000000i64, "companyHandle": "c1"})),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{:?}", err);

    let err = UserService::register(
        &pool,
        &obj(json!({
            "username": "u".repeat(26),
            "password": "password",
            "firstName": "F",
            "lastName": "L",
            "email": "long@email.com"
        })),
        COST,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)), "{:?}", err);
    Ok(())
}

#[tokio::test]
async fn test_duplicate_company_name_is_named() -> Result<(), Box<dyn Error>> {
    let Some((pool, _guard)) = seeded_pool().await? else {
        return Ok(());
    };

    let err = CompanyService::create(&pool, &obj(json!({"handle": "c9", "name": "C2", "description": "d"})))
        .await
        .unwrap_err();
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, "Duplicate company name: C2"),
        other => panic!("expected conflict, got {:?}", other),
    }

    let err = CompanyService::update(&pool, "c1", &obj(json!({"name": "C3"}))).await.unwrap_err();
    match err {
        AppError::Conflict(msg) => assert_eq!(msg, "Duplicate company name: C3"),
        other => panic!("expected conflict, got {:?}", other),
    }
    Ok(())
}
