//! End-to-end smoke tests for the full miheater stack.
//!
//! Each test wires the real integration to the simulated transport and
//! exercises the same lifecycle the daemon runs: setup → discovery →
//! service calls → polls → teardown. No network is touched.

use miheater_adapter_miot::{HeaterConfig, HeaterIntegration, models};
use miheater_adapter_virtual::VirtualHeater;
use miheater_app::ports::integration::Integration;
use miheater_domain::entity::{AttributeValue, Entity, EntityState};
use serde_json::json;

/// Build a fully-wired integration for `model`, returning the transport
/// handle for failure injection.
fn wired(model: &str) -> (HeaterIntegration<VirtualHeater>, VirtualHeater) {
    let profile = models::lookup(model).expect("registry model should resolve");
    let client = VirtualHeater::new(&profile);
    let integration = HeaterIntegration::new(HeaterConfig::default(), client.clone());
    (integration, client)
}

fn entity<'a>(entities: &'a [Entity], entity_id: &str) -> &'a Entity {
    entities
        .iter()
        .find(|e| e.entity_id == entity_id)
        .unwrap_or_else(|| panic!("no entity {entity_id}"))
}

// ---------------------------------------------------------------------------
// Setup and discovery
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_discover_full_entity_set_for_za2() {
    let (mut integration, _) = wired(models::MODEL_ZA2);
    let discovered = integration.setup().await.unwrap();

    assert_eq!(discovered.len(), 1);
    let dd = &discovered[0];
    assert_eq!(dd.device.model.as_deref(), Some(models::MODEL_ZA2));
    assert_eq!(dd.device.manufacturer.as_deref(), Some("Zhimi"));

    let ids: Vec<&str> = dd.entities.iter().map(|e| e.entity_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "climate.mi_heater",
            "switch.mi_heater_buzzer",
            "switch.mi_heater_child_lock",
            "number.mi_heater_delay_off",
        ]
    );
}

#[tokio::test]
async fn should_include_humidity_only_for_humidity_models() {
    let (mut with, _) = wired(models::MODEL_ZA2);
    let discovered = with.setup().await.unwrap();
    let climate = entity(&discovered[0].entities, "climate.mi_heater");
    assert!(climate.get_attribute("humidity").is_some());

    let (mut without, _) = wired(models::MODEL_MC2);
    let discovered = without.setup().await.unwrap();
    let climate = entity(&discovered[0].entities, "climate.mi_heater");
    assert!(climate.get_attribute("humidity").is_none());
}

#[tokio::test]
async fn should_bound_climate_by_profile_temperature_range() {
    let (mut integration, _) = wired(models::MODEL_NB1);
    let discovered = integration.setup().await.unwrap();
    let climate = entity(&discovered[0].entities, "climate.mi_heater");
    assert_eq!(climate.get_attribute("min_temp"), Some(&AttributeValue::Float(16.0)));
    assert_eq!(climate.get_attribute("max_temp"), Some(&AttributeValue::Float(32.0)));
}

// ---------------------------------------------------------------------------
// Service calls
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_run_a_full_user_session() {
    let (mut integration, _) = wired(models::MODEL_ZA2);
    let discovered = integration.setup().await.unwrap();
    let entities = &discovered[0].entities;
    let climate_id = entity(entities, "climate.mi_heater").id;
    let lock_id = entity(entities, "switch.mi_heater_child_lock").id;

    let climate = integration
        .handle_service_call(climate_id, "turn_on", json!({}))
        .await
        .unwrap();
    assert_eq!(climate.state, EntityState::On);

    let climate = integration
        .handle_service_call(climate_id, "set_temperature", json!({"temperature": 26.0}))
        .await
        .unwrap();
    assert_eq!(
        climate.get_attribute("target_temperature"),
        Some(&AttributeValue::Float(26.0))
    );

    let lock = integration
        .handle_service_call(lock_id, "turn_on", json!({}))
        .await
        .unwrap();
    assert_eq!(lock.state, EntityState::On);

    let climate = integration
        .handle_service_call(climate_id, "turn_off", json!({}))
        .await
        .unwrap();
    assert_eq!(climate.state, EntityState::Off);
}

#[tokio::test]
async fn should_pass_device_services_through_the_climate_entity() {
    let (mut integration, _) = wired(models::MODEL_ZA2);
    let discovered = integration.setup().await.unwrap();
    let climate_id = entity(&discovered[0].entities, "climate.mi_heater").id;

    integration
        .handle_service_call(climate_id, "set_buzzer", json!({"enabled": false}))
        .await
        .unwrap();
    integration
        .handle_service_call(climate_id, "set_led_brightness", json!({"brightness": "off"}))
        .await
        .unwrap();
    integration
        .handle_service_call(climate_id, "set_delay_off", json!({"seconds": 600}))
        .await
        .unwrap();

    let entities = integration.poll().await.unwrap();
    assert_eq!(
        entity(&entities, "switch.mi_heater_buzzer").state,
        EntityState::Off
    );
    assert_eq!(
        entity(&entities, "climate.mi_heater").get_attribute("led_brightness"),
        Some(&AttributeValue::String("off".to_string()))
    );
    assert_eq!(
        entity(&entities, "number.mi_heater_delay_off").get_attribute("value"),
        Some(&AttributeValue::Int(600))
    );
}

#[tokio::test]
async fn should_validate_at_the_facade_boundary() {
    let (mut integration, client) = wired(models::MODEL_MC2);
    let discovered = integration.setup().await.unwrap();
    let climate_id = entity(&discovered[0].entities, "climate.mi_heater").id;

    // Out-of-range target: rejected before any write reaches the device.
    let target_spec = models::lookup(models::MODEL_MC2)
        .unwrap()
        .property(miheater_domain::feature::Feature::TargetTemperature)
        .unwrap();
    let before = client.value(target_spec);
    let result = integration
        .handle_service_call(climate_id, "set_temperature", json!({"temperature": 12.0}))
        .await;
    assert!(matches!(
        result,
        Err(miheater_domain::error::MiHeaterError::OutOfRange(_))
    ));
    assert_eq!(client.value(target_spec), before);

    // mc2 has no dim level.
    let result = integration
        .handle_service_call(climate_id, "set_led_brightness", json!({"brightness": "dim"}))
        .await;
    assert!(matches!(
        result,
        Err(miheater_domain::error::MiHeaterError::UnsupportedFeature(_))
    ));
}

#[tokio::test]
async fn should_roundtrip_delay_off_boundary() {
    let (mut integration, _) = wired(models::MODEL_ZA2);
    let discovered = integration.setup().await.unwrap();
    let number_id = entity(&discovered[0].entities, "number.mi_heater_delay_off").id;

    let number = integration
        .handle_service_call(number_id, "set_value", json!({"value": 0}))
        .await
        .unwrap();
    assert_eq!(number.get_attribute("value"), Some(&AttributeValue::Int(0)));
    assert_eq!(number.state, EntityState::Off);
}

// ---------------------------------------------------------------------------
// Failure paths
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_go_unavailable_and_recover_across_polls() {
    let (mut integration, client) = wired(models::MODEL_ZA2);
    integration.setup().await.unwrap();

    client.set_failing(true);
    let entities = integration.poll().await.unwrap();
    assert!(entities.iter().all(|e| e.state == EntityState::Unavailable));

    client.set_failing(false);
    let entities = integration.poll().await.unwrap();
    assert!(entities.iter().all(|e| e.state != EntityState::Unavailable));
}

#[tokio::test]
async fn should_fail_setup_when_device_is_unreachable() {
    let (mut integration, client) = wired(models::MODEL_ZA2);
    client.set_failing(true);
    let result = integration.setup().await;
    assert!(matches!(
        result,
        Err(miheater_domain::error::MiHeaterError::Communication(_))
    ));
}

#[tokio::test]
async fn should_teardown_cleanly_after_session() {
    let (mut integration, _) = wired(models::MODEL_ZA1);
    integration.setup().await.unwrap();
    integration.poll().await.unwrap();
    integration.teardown().await.unwrap();

    let result = integration.poll().await;
    assert!(matches!(
        result,
        Err(miheater_domain::error::MiHeaterError::NotFound(_))
    ));
}
