//! Subscription wiring tests.
//!
//! The composer forwards subscribe hooks to the engine verbatim; these
//! tests drive them with a fixed stream and with a broadcast channel.

use std::sync::Arc;
use std::time::Duration;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, SubscriptionFieldFuture};
use async_stream::stream;
use futures_util::StreamExt;
use serde_json::json;
use tokio::sync::broadcast;

use graphforge::{
    FieldOptions, ObjectOptions, OperationOptions, SchemaComposer, TypeExpr,
};

fn composer_with_dummy_query() -> SchemaComposer {
    let mut composer = SchemaComposer::new();
    composer.object("Health", ObjectOptions::new());
    composer.field("Health", "ok", TypeExpr::boolean(), FieldOptions::new());
    composer.query(
        "Health",
        "health",
        TypeExpr::named("Health"),
        OperationOptions::new(),
        |_ctx| {
            FieldFuture::new(async {
                Ok(Some(Value::from_json(json!({"ok": true})).unwrap()))
            })
        },
    );
    composer
}

#[test]
fn subscription_root_appears_in_the_schema() {
    let mut composer = composer_with_dummy_query();
    composer.subscription(
        "Ticker",
        "ticks",
        TypeExpr::int(),
        OperationOptions::new().non_null(),
        |_ctx| {
            SubscriptionFieldFuture::new(async {
                Ok(futures_util::stream::iter([
                    Ok::<_, async_graphql::Error>(Value::from(1)),
                ]))
            })
        },
    );

    let sdl = composer.build().unwrap().sdl();
    assert!(sdl.contains("type Subscription"));
    assert!(sdl.contains("ticks: Int!"));
}

#[tokio::test]
async fn subscription_yields_events_from_the_forwarded_hook() {
    let mut composer = composer_with_dummy_query();
    composer.subscription(
        "Ticker",
        "ticks",
        TypeExpr::int(),
        OperationOptions::new().non_null(),
        |_ctx| {
            SubscriptionFieldFuture::new(async {
                Ok(futures_util::stream::iter([
                    Ok::<_, async_graphql::Error>(Value::from(1)),
                    Ok(Value::from(2)),
                    Ok(Value::from(3)),
                ]))
            })
        },
    );

    let schema = composer.build().unwrap();
    let mut stream = Box::pin(schema.execute_stream("subscription { ticks }"));

    let mut seen = Vec::new();
    while let Some(response) = stream.next().await {
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        seen.push(response.data.into_json().unwrap());
    }
    assert_eq!(
        seen,
        vec![
            json!({"ticks": 1}),
            json!({"ticks": 2}),
            json!({"ticks": 3})
        ]
    );
}

#[tokio::test]
async fn subscription_delivers_broadcast_events() {
    let (sender, _) = broadcast::channel::<i64>(16);
    let sender = Arc::new(sender);
    let hook_sender = sender.clone();

    let mut composer = composer_with_dummy_query();
    composer.subscription(
        "Ticker",
        "ticks",
        TypeExpr::int(),
        OperationOptions::new().non_null(),
        move |_ctx| {
            let mut receiver = hook_sender.subscribe();
            SubscriptionFieldFuture::new(async move {
                Ok(stream! {
                    loop {
                        match receiver.recv().await {
                            Ok(tick) => yield Ok(Value::from(tick)),
                            Err(broadcast::error::RecvError::Lagged(_)) => continue,
                            Err(broadcast::error::RecvError::Closed) => break,
                        }
                    }
                })
            })
        },
    );

    let schema = composer.build().unwrap();
    let mut stream = Box::pin(schema.execute_stream("subscription { ticks }"));

    // The hook only subscribes once the stream is first polled, so keep
    // publishing until the subscriber reports an event.
    let publisher = tokio::spawn(async move {
        loop {
            let _ = sender.send(7);
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    });

    let response = stream.next().await.expect("subscription ended early");
    publisher.abort();

    assert!(response.errors.is_empty(), "{:?}", response.errors);
    assert_eq!(response.data.into_json().unwrap(), json!({"ticks": 7}));
}
