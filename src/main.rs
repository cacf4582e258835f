use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use courier_dispatch::config::Config;
use courier_dispatch::engine::assignment::AssignmentEngine;
use courier_dispatch::engine::lifecycle::OrderLifecycle;
use courier_dispatch::engine::matching::strategy_from_name;
use courier_dispatch::engine::sweeper::run_expiry_sweeper;
use courier_dispatch::error::DispatchError;
use courier_dispatch::models::courier::Courier;
use courier_dispatch::models::payment::PaymentMode;
use courier_dispatch::services::{dashboard, payments, ratings};
use courier_dispatch::state::AppState;

#[tokio::main]
async fn main() -> Result<(), DispatchError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let state = Arc::new(AppState::new(config.event_buffer_size));
    let strategy = strategy_from_name(&config.matching_strategy)?;
    let engine = Arc::new(AssignmentEngine::new(state.clone(), strategy));
    let lifecycle = Arc::new(OrderLifecycle::new(
        state.clone(),
        engine,
        config.allowed_categories.clone(),
    ));

    let sweeper = tokio::spawn(run_expiry_sweeper(
        lifecycle.clone(),
        config.sweep_interval(),
        config.expiry_threshold(),
    ));

    // Event tap: everything the engine broadcasts, mirrored into the log.
    let mut events = state.events_tx.subscribe();
    let event_tap = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            info!(order_id = %event.order_id, kind = ?event.kind, "event");
        }
    });

    run_demo(&state, &lifecycle)?;

    if let Ok(metrics) = state.metrics.encode() {
        info!("final metrics:\n{metrics}");
    }

    sweeper.abort();
    event_tap.abort();
    Ok(())
}

fn run_demo(state: &AppState, lifecycle: &OrderLifecycle) -> Result<(), DispatchError> {
    let bob = Courier::new("Bob");
    let charlie = Courier::new("Charlie");
    let (bob_id, charlie_id) = (bob.id, charlie.id);
    state.couriers.insert(bob_id, bob);
    state.couriers.insert(charlie_id, charlie);

    let customer = Uuid::new_v4();

    // Two couriers, three orders: the third has to wait in the backlog.
    let first = lifecycle.place(customer, "ELECTRONICS")?;
    let second = lifecycle.place(customer, "BOOKS")?;
    let third = lifecycle.place(customer, "DOCUMENTS")?;
    info!(status = ?third.status, "third order after placement");

    lifecycle.pickup(first.id)?;
    lifecycle.deliver(first.id)?;

    // Delivering the first order freed its courier, which takes the queued
    // third order with no new placement call.
    let third = state
        .orders
        .get(&third.id)
        .ok_or_else(|| DispatchError::NotFound(format!("order {} not found", third.id)))?;
    info!(status = ?third.status, courier = ?third.assigned_courier, "third order after delivery");

    lifecycle.cancel(second.id)?;

    if let Err(err) = lifecycle.place(customer, "ANTIMATTER") {
        info!(error = %err, "rejected placement");
    }

    payments::process_payment(state, first.id, 150.0, PaymentMode::Upi)?;

    if let Some(courier_id) = first.assigned_courier {
        let average = ratings::rate_courier(state, courier_id, 5)?;
        info!(%courier_id, average, "courier rated");
    }

    let top = dashboard::top_couriers_by_rating(state, 5);
    if let Ok(json) = serde_json::to_string_pretty(&top) {
        info!("top couriers by rating:\n{json}");
    }

    Ok(())
}
