//! Client/service round trips over a real socket
//!
//! Each test binds the collection service on an ephemeral port and drives it
//! with the same `RestEntityStore` the gateway uses.

use chrono::{Duration, NaiveDate, Utc};
use tokio::net::TcpListener;

use staffgate_core::{
    Department, Employee, Filter, ListQuery, NewDepartment, NewEmployee, NewSession, SessionPatch,
    SessionRecord, StoreError,
};
use staffgate_store::{
    service, Entity, EntityStore, IdStrategy, MemoryStore, RestEntityStore, StoreClientConfig,
};

async fn spawn_store<E: Entity>(store: MemoryStore<E>) -> RestEntityStore<E> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local addr");
    let app = service::collection_router(store);
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let config = StoreClientConfig::new(format!("http://{address}"), 2);
    RestEntityStore::new(&config).expect("build client")
}

fn department(name: &str, email: &str) -> NewDepartment {
    NewDepartment {
        name: name.to_string(),
        location: "HQ".to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn department_crud_round_trip() {
    let client = spawn_store(MemoryStore::<Department>::new(IdStrategy::Sequential)).await;

    let created = client.create(&department("Eng", "eng@x.com")).await.unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.name, "Eng");

    let fetched = client.get(&created.id).await.unwrap();
    assert_eq!(fetched.email, "eng@x.com");

    let listed = client.list(&ListQuery::default()).await.unwrap();
    assert_eq!(listed.num_results, 1);
    assert_eq!(listed.page, 1);

    client.delete(&created.id).await.unwrap();
    assert!(matches!(
        client.get(&created.id).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(matches!(
        client.delete(&created.id).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn full_update_replaces_the_record_in_place() {
    let client = spawn_store(MemoryStore::<Department>::new(IdStrategy::Sequential)).await;

    let created = client.create(&department("Eng", "eng@x.com")).await.unwrap();
    let updated = client
        .update(&created.id, &department("Engineering", "eng@x.com"))
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.name, "Engineering");

    let fetched = client.get(&created.id).await.unwrap();
    assert_eq!(fetched.name, "Engineering");

    assert!(matches!(
        client.update(&99, &department("Ghost", "g@x.com")).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn duplicate_department_name_is_a_conflict_over_the_wire() {
    let client = spawn_store(MemoryStore::<Department>::new(IdStrategy::Sequential)).await;

    client.create(&department("Eng", "eng@x.com")).await.unwrap();
    let err = client
        .create(&department("Eng", "other@x.com"))
        .await
        .unwrap_err();
    assert!(err.is_conflict(), "got {err:?}");
}

#[tokio::test]
async fn single_lookup_returns_at_most_one_record() {
    let client = spawn_store(MemoryStore::<Employee>::new(IdStrategy::Sequential)).await;

    let new = NewEmployee {
        firstname: "A".to_string(),
        lastname: "B".to_string(),
        hiredate: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        occupation: 1,
    };
    client.create(&new).await.unwrap();

    let found = client
        .find_one(&[Filter::eq("firstname", "A")])
        .await
        .unwrap();
    assert_eq!(found.map(|e| e.lastname), Some("B".to_string()));

    let missing = client
        .find_one(&[Filter::eq("firstname", "Z")])
        .await
        .unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn filtered_list_paginates_over_the_wire() {
    let client = spawn_store(MemoryStore::<Employee>::new(IdStrategy::Sequential)).await;

    for i in 0..5 {
        client
            .create(&NewEmployee {
                firstname: format!("E{i}"),
                lastname: "Doe".to_string(),
                hiredate: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                occupation: if i < 4 { 1 } else { 2 },
            })
            .await
            .unwrap();
    }

    let page = client
        .list(&ListQuery {
            filters: vec![Filter::eq("occupation", 1)],
            page: Some(2),
            per_page: Some(3),
        })
        .await
        .unwrap();
    assert_eq!(page.num_results, 4);
    assert_eq!(page.total_pages, 2);
    assert_eq!(page.page, 2);
    assert_eq!(page.objects.len(), 1);
}

#[tokio::test]
async fn session_patch_round_trip() {
    let client = spawn_store(MemoryStore::<SessionRecord>::new(IdStrategy::Token)).await;

    let created = client
        .create(&NewSession {
            id: Some("cafe0000cafe0000cafe0000cafe0000".to_string()),
            user_id: None,
            last_used: Utc::now() - Duration::minutes(10),
        })
        .await
        .unwrap();

    let patched = client
        .patch(
            &created.id,
            &SessionPatch {
                user_id: Some(Some(42)),
                last_used: Utc::now(),
            },
        )
        .await
        .unwrap();
    assert_eq!(patched.user_id, Some(42));
    assert!(patched.last_used > created.last_used);

    let fetched = client.get(&created.id).await.unwrap();
    assert_eq!(fetched.user_id, Some(42));
}

#[tokio::test]
async fn explicit_session_id_collision_is_a_conflict() {
    let client = spawn_store(MemoryStore::<SessionRecord>::new(IdStrategy::Token)).await;

    let new = NewSession {
        id: Some("feed0000feed0000feed0000feed0000".to_string()),
        user_id: None,
        last_used: Utc::now(),
    };
    client.create(&new).await.unwrap();
    let err = client.create(&new).await.unwrap_err();
    assert!(err.is_conflict(), "got {err:?}");
}

#[tokio::test]
async fn refused_connection_maps_to_unreachable() {
    // Bind then drop, so the port is known-closed.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local addr");
    drop(listener);

    let config = StoreClientConfig::new(format!("http://{address}"), 1);
    let client: RestEntityStore<Department> = RestEntityStore::new(&config).expect("build client");

    let err = client.get(&1).await.unwrap_err();
    assert!(err.is_unreachable(), "got {err:?}");

    let err = client.list(&ListQuery::default()).await.unwrap_err();
    assert!(err.is_unreachable(), "got {err:?}");
}
