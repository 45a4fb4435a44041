//! End-to-end tests against a running tabletopd server

mod common;

use common::TestServer;
use serde_json::json;
use tabletopd::Config;

#[tokio::test]
async fn test_server_starts_and_stops() {
    let server = TestServer::start().await.expect("Failed to start server");
    drop(server);
}

#[tokio::test]
async fn test_root_and_health_endpoints() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server.get("/").await.expect("Failed to get root");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "tabletopd");

    let resp = server.get("/health").await.expect("Failed to get health");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["creatures"], 30);
}

#[tokio::test]
async fn test_roll_endpoint() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .post_json("/dice/roll", &json!({"expression": "2d6+3"}))
        .await
        .expect("Failed to post roll");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["expression"], "2d6+3");
    assert_eq!(body["count"], 2);
    assert_eq!(body["faces"], 6);
    assert_eq!(body["modifier"], 3);
    assert_eq!(body["mode"], "normal");

    let rolls = body["rolls"].as_array().expect("rolls is an array");
    assert_eq!(rolls.len(), 2);
    let mut sum = 0;
    for die in rolls {
        let die = die.as_u64().expect("die is a number");
        assert!((1..=6).contains(&die));
        sum += die;
    }
    assert_eq!(body["subtotal"].as_u64().unwrap(), sum);
    assert_eq!(body["total"].as_i64().unwrap(), sum as i64 + 3);
}

#[tokio::test]
async fn test_roll_error_kinds_are_distinct() {
    let server = TestServer::start().await.expect("Failed to start server");

    for (expression, kind) in [
        ("banana", "malformed_expression"),
        ("101d6", "count_out_of_range"),
        ("2d7", "unsupported_die_size"),
    ] {
        let resp = server
            .post_json("/dice/roll", &json!({"expression": expression}))
            .await
            .expect("Failed to post roll");
        assert_eq!(resp.status(), 400, "expression {:?}", expression);

        let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
        assert_eq!(body["kind"], kind, "expression {:?}", expression);
    }
}

#[tokio::test]
async fn test_roll_with_advantage() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .post_json("/dice/roll", &json!({"expression": "d20", "mode": "advantage"}))
        .await
        .expect("Failed to post roll");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["mode"], "advantage");
    let kept = body["rolls"][0].as_u64().expect("kept die");
    let discarded = body["discarded"].as_u64().expect("discarded die");
    assert!(kept >= discarded);
    assert!((1..=20).contains(&kept));
    assert!((1..=20).contains(&discarded));
}

#[tokio::test]
async fn test_advantage_rejected_for_non_d20() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .post_json(
            "/dice/roll",
            &json!({"expression": "2d6", "mode": "disadvantage"}),
        )
        .await
        .expect("Failed to post roll");
    assert_eq!(resp.status(), 400);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["kind"], "advantage_requires_d20");
}

#[tokio::test]
async fn test_roll_multiple_endpoint() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .post_json(
            "/dice/roll/multiple",
            &json!({"expression": "4d6", "times": 6}),
        )
        .await
        .expect("Failed to post roll");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 6);
    let rolls = body["rolls"].as_array().expect("rolls is an array");
    assert_eq!(rolls.len(), 6);
    for outcome in rolls {
        assert_eq!(outcome["count"], 4);
        assert_eq!(outcome["faces"], 6);
        assert_eq!(outcome["rolls"].as_array().unwrap().len(), 4);
    }

    // Over the repeat bound
    let resp = server
        .post_json(
            "/dice/roll/multiple",
            &json!({"expression": "4d6", "times": 21}),
        )
        .await
        .expect("Failed to post roll");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["kind"], "repeat_out_of_range");
}

#[tokio::test]
async fn test_average_endpoint() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .get("/dice/average/2d6+3")
        .await
        .expect("Failed to get average");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["average"], 10.0);

    let resp = server
        .get("/dice/average/1d20")
        .await
        .expect("Failed to get average");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["average"], 10.5);

    let resp = server
        .get("/dice/average/2d7")
        .await
        .expect("Failed to get average");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_history_lifecycle() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server.get("/dice/history").await.expect("Failed to get history");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 0);

    server
        .post_json("/dice/roll", &json!({"expression": "1d4"}))
        .await
        .expect("Failed to post roll");
    server
        .post_json("/dice/roll", &json!({"expression": "1d6"}))
        .await
        .expect("Failed to post roll");

    let resp = server.get("/dice/history").await.expect("Failed to get history");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 2);
    // Newest first
    assert_eq!(body["rolls"][0]["expression"], "1d6");
    assert_eq!(body["rolls"][1]["expression"], "1d4");

    let resp = server
        .delete("/dice/history")
        .await
        .expect("Failed to clear history");
    assert_eq!(resp.status(), 200);

    let resp = server.get("/dice/history").await.expect("Failed to get history");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 0);
    assert!(body["rolls"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_capacity_from_config() {
    let config = Config {
        history_capacity: 3,
        ..Default::default()
    };
    let server = TestServer::start_with(config)
        .await
        .expect("Failed to start server");

    for _ in 0..5 {
        server
            .post_json("/dice/roll", &json!({"expression": "1d6"}))
            .await
            .expect("Failed to post roll");
    }

    let resp = server
        .get("/dice/history?limit=100")
        .await
        .expect("Failed to get history");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 3);
}

#[tokio::test]
async fn test_generate_encounter_endpoint() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .post_json(
            "/encounter/generate",
            &json!({"party_level": 5, "party_size": 4, "difficulty": "moderate"}),
        )
        .await
        .expect("Failed to post encounter");
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["target_xp"], 320);
    assert_eq!(body["difficulty"], "moderate");

    let creatures = body["creatures"].as_array().expect("creatures is an array");
    assert!(!creatures.is_empty());
    assert_eq!(
        body["statistics"]["creature_count"].as_u64().unwrap() as usize,
        creatures.len()
    );

    // Overshoot bounded by the costliest creature in the whole catalog (480)
    let total_xp = body["total_xp"].as_u64().unwrap();
    assert!(total_xp <= 320 + 480);
    assert!(!body["tactics"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_encounter_validation_errors() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server
        .post_json(
            "/encounter/generate",
            &json!({"party_level": 5, "difficulty": "impossible"}),
        )
        .await
        .expect("Failed to post encounter");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["kind"], "unknown_difficulty_tier");

    let resp = server
        .post_json("/encounter/generate", &json!({"party_level": 0}))
        .await
        .expect("Failed to post encounter");
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["kind"], "party_out_of_range");
}

#[tokio::test]
async fn test_bestiary_endpoints() {
    let server = TestServer::start().await.expect("Failed to start server");

    let resp = server.get("/bestiary").await.expect("Failed to get bestiary");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 30);

    let resp = server
        .get("/bestiary?min_xp=100&max_xp=200")
        .await
        .expect("Failed to get bestiary");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    for creature in body["creatures"].as_array().unwrap() {
        let xp = creature["xp"].as_u64().unwrap();
        assert!((100..=200).contains(&xp));
    }

    let resp = server
        .get("/bestiary/troll")
        .await
        .expect("Failed to get creature");
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["name"], "Troll");
    assert_eq!(body["xp"], 160);

    let resp = server
        .get("/bestiary/tarrasque")
        .await
        .expect("Failed to get creature");
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["kind"], "creature_not_found");
}

#[tokio::test]
async fn test_parallel_servers_are_isolated() {
    let server1 = TestServer::start().await.expect("Failed to start server 1");
    let server2 = TestServer::start().await.expect("Failed to start server 2");

    assert_ne!(server1.addr, server2.addr);

    server1
        .post_json("/dice/roll", &json!({"expression": "1d6"}))
        .await
        .expect("Failed to post roll");

    // server2's ledger is untouched
    let resp = server2
        .get("/dice/history")
        .await
        .expect("Failed to get history");
    let body: serde_json::Value = resp.json().await.expect("Failed to parse JSON");
    assert_eq!(body["count"], 0);
}
