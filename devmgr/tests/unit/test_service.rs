//! Device service tests

use std::sync::Arc;

use async_trait::async_trait;
use devmgr::devices::error::{DeviceError, ErrorKind};
use devmgr::devices::service::DeviceService;
use devmgr::errors::AppError;
use devmgr::models::device::{
    Device, DeviceChanges, DeviceDetails, DeviceFilter, DeviceId, DeviceState, NewDevice,
};
use devmgr::storage::memory::InMemoryDeviceStore;
use devmgr::storage::store::DeviceStore;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn setup() -> (Arc<InMemoryDeviceStore>, DeviceService) {
    let store = Arc::new(InMemoryDeviceStore::new());
    let service = DeviceService::new(store.clone());
    (store, service)
}

/// Put a device in use behind the service's back
async fn mark_in_use(store: &InMemoryDeviceStore, device: &Device) -> Device {
    let mut in_use = device.clone();
    in_use.state = DeviceState::InUse;
    store.save(in_use).await.unwrap()
}

#[tokio::test]
async fn test_create_device_defaults() {
    let (_, service) = setup();

    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    assert_eq!(device.name, "Device1");
    assert_eq!(device.brand, "BrandA");
    assert_eq!(device.state, DeviceState::Available);
    assert!(device.creation_time <= chrono::Utc::now());
}

#[tokio::test]
async fn test_create_device_rejects_blank_fields() {
    let (store, service) = setup();

    let err = service
        .create("  ".to_string(), "BrandA".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = service
        .create("Device1".to_string(), "".to_string())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(store.is_empty());
}

#[tokio::test]
async fn test_get_missing_device_is_not_found() {
    let (_, service) = setup();

    let err = service.get_by_id(999).await.unwrap_err();
    assert!(matches!(err, DeviceError::NotFound(ref msg) if msg.contains("999")));
}

#[tokio::test]
async fn test_list_all_in_store_order() {
    let (_, service) = setup();
    for name in ["a", "b", "c"] {
        service
            .create(name.to_string(), "BrandA".to_string())
            .await
            .unwrap();
    }

    let names: Vec<String> = service
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_list_by_brand_returns_exact_matches_in_order() {
    let (_, service) = setup();
    let first = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    service
        .create("Device2".to_string(), "BrandB".to_string())
        .await
        .unwrap();
    let third = service
        .create("Device3".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    let devices = service.list_by_brand("BrandA").await.unwrap();
    assert_eq!(devices, vec![first, third]);

    assert!(service.list_by_brand("branda").await.unwrap().is_empty());
    assert!(service.list_by_brand("BrandC").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_by_state() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    service
        .create("Device2".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    let in_use = mark_in_use(&store, &device).await;

    let devices = service.list_by_state(DeviceState::InUse).await.unwrap();
    assert_eq!(devices, vec![in_use]);
    assert_eq!(
        service
            .list_by_state(DeviceState::Available)
            .await
            .unwrap()
            .len(),
        1
    );
    assert!(service
        .list_by_state(DeviceState::Inactive)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_delete_available_device() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    assert_ok!(service.delete(device.id).await);

    let err = assert_err!(service.get_by_id(device.id).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_in_use_device_is_conflict() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    let in_use = mark_in_use(&store, &device).await;

    let err = assert_err!(service.delete(device.id).await);
    assert!(matches!(err, DeviceError::Conflict(ref msg) if msg == "Cannot delete a device that is in use"));
    assert_eq!(service.get_by_id(device.id).await.unwrap(), in_use);
}

#[tokio::test]
async fn test_delete_missing_device_is_not_found() {
    let (_, service) = setup();
    assert_eq!(
        service.delete(42).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_full_update_replaces_fields_and_keeps_identity() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    let mut details = DeviceDetails::new("Renamed", "BrandB", DeviceState::Inactive);
    details.id = Some(777);
    details.creation_time = Some(chrono::Utc::now() + chrono::Duration::days(30));

    let updated = service.full_update(device.id, details).await.unwrap();

    assert_eq!(updated.id, device.id);
    assert_eq!(updated.creation_time, device.creation_time);
    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.brand, "BrandB");
    assert_eq!(updated.state, DeviceState::Inactive);
    assert_eq!(service.get_by_id(device.id).await.unwrap(), updated);
    assert_eq!(service.get_by_id(777).await.unwrap_err().kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_full_update_missing_device_is_not_found() {
    let (_, service) = setup();
    let details = DeviceDetails::new("Device1", "BrandA", DeviceState::Available);
    assert_eq!(
        service.full_update(5, details).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_full_update_in_use_rejects_identity_change() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    let in_use = mark_in_use(&store, &device).await;

    let details = DeviceDetails::new("Changed", "BrandA", DeviceState::Available);
    let err = service.full_update(device.id, details).await.unwrap_err();

    assert!(matches!(
        err,
        DeviceError::Conflict(ref msg) if msg == "Cannot update name or brand of a device that is in use"
    ));
    assert_eq!(service.get_by_id(device.id).await.unwrap(), in_use);
}

#[tokio::test]
async fn test_full_update_in_use_allows_state_change_with_same_identity() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    mark_in_use(&store, &device).await;

    let details = DeviceDetails::new("Device1", "BrandA", DeviceState::Available);
    let updated = service.full_update(device.id, details).await.unwrap();

    assert_eq!(updated.state, DeviceState::Available);
    assert_eq!(updated.creation_time, device.creation_time);
}

#[tokio::test]
async fn test_full_update_rejects_blank_fields() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    let details = DeviceDetails::new("", "BrandA", DeviceState::Available);
    let err = service.full_update(device.id, details).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(service.get_by_id(device.id).await.unwrap(), device);
}

#[tokio::test]
async fn test_partial_update_applies_only_supplied_fields() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    let updated = service
        .partial_update(device.id, DeviceChanges::default().with_brand("BrandB"))
        .await
        .unwrap();

    assert_eq!(updated.name, "Device1");
    assert_eq!(updated.brand, "BrandB");
    assert_eq!(updated.state, DeviceState::Available);
    assert_eq!(updated.creation_time, device.creation_time);
}

#[tokio::test]
async fn test_partial_update_creation_time_is_conflict_in_any_state() {
    let (store, service) = setup();
    let available = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    let other = service
        .create("Device2".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    mark_in_use(&store, &other).await;

    for id in [available.id, other.id] {
        let changes = DeviceChanges {
            creation_time_requested: true,
            ..Default::default()
        };
        let err = service.partial_update(id, changes).await.unwrap_err();
        assert!(matches!(err, DeviceError::Conflict(ref msg) if msg == "Creation time cannot be updated"));
    }
}

#[tokio::test]
async fn test_partial_update_missing_device_wins_over_creation_time() {
    let (_, service) = setup();
    let changes = DeviceChanges {
        creation_time_requested: true,
        ..Default::default()
    };
    assert_eq!(
        service.partial_update(9, changes).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_partial_update_creation_time_wins_over_bad_fields() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    let bodies = [
        json!({ "creationTime": "2001-01-01T00:00:00Z", "name": " " }),
        json!({ "creationTime": "2001-01-01T00:00:00Z", "colour": "red" }),
        json!({ "state": "LOST", "creationTime": "2001-01-01T00:00:00Z" }),
    ];
    for body in bodies {
        let fields = body.as_object().cloned().unwrap();
        let err = service
            .partial_update(device.id, DeviceChanges::from_fields(fields))
            .await
            .unwrap_err();
        assert!(matches!(err, DeviceError::Conflict(ref msg) if msg == "Creation time cannot be updated"));
    }

    let unchanged = service.get_by_id(device.id).await.unwrap();
    assert_eq!(unchanged, device);
}

#[tokio::test]
async fn test_partial_update_missing_device_wins_over_bad_fields() {
    let (_, service) = setup();

    let blank = DeviceChanges::default().with_name(" ");
    assert_eq!(
        service.partial_update(9, blank).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );

    let unknown = DeviceChanges::from_fields(json!({ "colour": "red" }).as_object().cloned().unwrap());
    assert_eq!(
        service.partial_update(9, unknown).await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn test_partial_update_in_use_rejects_any_identity_change() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    let in_use = mark_in_use(&store, &device).await;

    let attempts = [
        DeviceChanges::default().with_name("Changed"),
        DeviceChanges::default().with_brand("BrandB"),
        DeviceChanges::default().with_name("Device1").with_brand("BrandB"),
        DeviceChanges::default()
            .with_name("Changed")
            .with_state(DeviceState::Available),
    ];

    for changes in attempts {
        let err = service.partial_update(device.id, changes).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(service.get_by_id(device.id).await.unwrap(), in_use);
    }
}

#[tokio::test]
async fn test_partial_update_in_use_allows_equal_values_and_state_change() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    mark_in_use(&store, &device).await;

    let same = service
        .partial_update(
            device.id,
            DeviceChanges::default().with_name("Device1").with_brand("BrandA"),
        )
        .await
        .unwrap();
    assert_eq!(same.state, DeviceState::InUse);

    let released = service
        .partial_update(
            device.id,
            DeviceChanges::default().with_state(DeviceState::Available),
        )
        .await
        .unwrap();
    assert_eq!(released.state, DeviceState::Available);
    assert_eq!(released.name, "Device1");
    assert_eq!(released.brand, "BrandA");
}

#[tokio::test]
async fn test_partial_update_rejects_blank_values() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    let err = service
        .partial_update(device.id, DeviceChanges::default().with_name(" "))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_creation_time_survives_repeated_updates() {
    let (_, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();

    for round in 0..3 {
        let mut details = DeviceDetails::new(format!("Name{}", round), "BrandA", DeviceState::Inactive);
        details.creation_time = Some(chrono::Utc::now());
        let updated = service.full_update(device.id, details).await.unwrap();
        assert_eq!(updated.creation_time, device.creation_time);

        let updated = service
            .partial_update(
                device.id,
                DeviceChanges::default().with_state(DeviceState::Available),
            )
            .await
            .unwrap();
        assert_eq!(updated.creation_time, device.creation_time);
    }
}

#[tokio::test]
async fn test_in_use_lifecycle_scenario() {
    let (store, service) = setup();
    let device = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap();
    assert_eq!(device.state, DeviceState::Available);

    let in_use = mark_in_use(&store, &device).await;

    let details = DeviceDetails::new("Changed", "BrandA", DeviceState::Available);
    assert_eq!(
        service.full_update(device.id, details).await.unwrap_err().kind(),
        ErrorKind::Conflict
    );
    assert_eq!(service.get_by_id(device.id).await.unwrap(), in_use);

    let updated = service
        .partial_update(
            device.id,
            DeviceChanges::default().with_state(DeviceState::Available),
        )
        .await
        .unwrap();
    assert_eq!(updated.state, DeviceState::Available);
    assert_eq!(updated.name, "Device1");
    assert_eq!(updated.brand, "BrandA");
}

/// Store whose every call fails
struct BrokenStore;

#[async_trait]
impl DeviceStore for BrokenStore {
    async fn get(&self, _id: DeviceId) -> Result<Option<Device>, AppError> {
        Err(AppError::StorageError("disk unavailable".to_string()))
    }

    async fn list(&self) -> Result<Vec<Device>, AppError> {
        Err(AppError::StorageError("disk unavailable".to_string()))
    }

    async fn list_by(&self, _filter: &DeviceFilter) -> Result<Vec<Device>, AppError> {
        Err(AppError::StorageError("disk unavailable".to_string()))
    }

    async fn insert(&self, _device: NewDevice) -> Result<Device, AppError> {
        Err(AppError::StorageError("disk unavailable".to_string()))
    }

    async fn save(&self, _device: Device) -> Result<Device, AppError> {
        Err(AppError::StorageError("disk unavailable".to_string()))
    }

    async fn delete(&self, _device: &Device) -> Result<(), AppError> {
        Err(AppError::StorageError("disk unavailable".to_string()))
    }
}

#[tokio::test]
async fn test_store_failures_propagate() {
    let service = DeviceService::new(Arc::new(BrokenStore));

    let err = service
        .create("Device1".to_string(), "BrandA".to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DeviceError::Store(AppError::StorageError(_))));

    assert_eq!(service.get_by_id(1).await.unwrap_err().kind(), ErrorKind::Store);
    assert_eq!(service.list_all().await.unwrap_err().kind(), ErrorKind::Store);
    assert_eq!(
        service.list_by_brand("BrandA").await.unwrap_err().kind(),
        ErrorKind::Store
    );
    assert_eq!(service.delete(1).await.unwrap_err().kind(), ErrorKind::Store);
}
