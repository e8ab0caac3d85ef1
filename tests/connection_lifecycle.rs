//! Integration tests for the connection lifecycle: registration, the
//! welcome banner, liveness, and teardown.

mod common;

use common::{TestClient, TestServer, scenario_config};
use std::time::Duration;

#[tokio::test]
async fn happy_registration_sends_banner_and_auto_join() {
    let server = TestServer::spawn().await.expect("failed to spawn server");
    let mut client = TestClient::connect(&server.address(), "alice")
        .await
        .expect("failed to connect");

    client.send_raw("NICK alice").await.unwrap();
    client.send_raw("PASS x").await.unwrap();
    client.send_raw("USER alice 0 * :Alice").await.unwrap();

    let expected = [
        ":debugirc 001 alice :Hi alice",
        ":debugirc 002 alice :Your host is debugirc, running version 0.0.0",
        ":debugirc 003 alice :This server was created 0",
        ":debugirc 004 alice :debugirc 0.0.0 - n",
        ":debugirc 375 alice :- debugirc DebugIRC -",
        ":debugirc 372 alice :- This is debug irc interface for logging and similar tasks",
        ":alice!alice JOIN #system :#system",
    ];
    for want in expected {
        let got = client.recv_line().await.expect("banner line");
        assert_eq!(got, want);
    }
}

#[tokio::test]
async fn empty_nick_is_rejected_without_a_reply() {
    let server = TestServer::spawn().await.expect("failed to spawn server");
    let mut client = TestClient::connect(&server.address(), "nobody")
        .await
        .expect("failed to connect");

    client.send_raw("NICK ").await.unwrap();
    client.send_raw("USER a 0 * :a").await.unwrap();

    let closed = client
        .expect_silent_close(Duration::from_secs(3))
        .await
        .expect("no output expected before close");
    assert!(closed, "server should close a rejected session");
}

#[tokio::test]
async fn silent_client_hits_the_registration_timeout() {
    let server = TestServer::spawn().await.expect("failed to spawn server");
    let mut client = TestClient::connect(&server.address(), "mute")
        .await
        .expect("failed to connect");

    let line = client
        .recv_line_timeout(Duration::from_secs(4))
        .await
        .expect("timeout error line");
    assert_eq!(line, "ERROR: registration timeout");
    assert!(client.expect_close(Duration::from_secs(3)).await);
}

#[tokio::test]
async fn ping_round_trip_echoes_the_token() {
    let server = TestServer::spawn().await.expect("failed to spawn server");
    let mut client = TestClient::connect(&server.address(), "alice")
        .await
        .expect("failed to connect");
    client.register().await.expect("registration failed");

    client.send_raw("PING 12345").await.unwrap();
    let pong = client.recv_line().await.expect("PONG");
    assert_eq!(pong, ":debugirc PONG debugirc :12345");
}

#[tokio::test]
async fn unknown_command_draws_421() {
    let server = TestServer::spawn().await.expect("failed to spawn server");
    let mut client = TestClient::connect(&server.address(), "alice")
        .await
        .expect("failed to connect");
    client.register().await.expect("registration failed");

    client.send_raw("FROB foo").await.unwrap();
    let reply = client.recv_line().await.expect("421 reply");
    assert_eq!(
        reply,
        ":debugirc 421 alice FROB :Command FROB is unknown or unsupported"
    );
}

#[tokio::test]
async fn quit_tears_the_session_down() {
    let server = TestServer::spawn().await.expect("failed to spawn server");
    let mut client = TestClient::connect(&server.address(), "alice")
        .await
        .expect("failed to connect");
    client.register().await.expect("registration failed");

    client.send_raw("QUIT").await.unwrap();
    assert!(client.expect_close(Duration::from_secs(3)).await);
}

#[tokio::test]
async fn idle_session_is_probed_then_timed_out() {
    let mut config = scenario_config();
    config.timeouts.ping_interval = 1;
    config.timeouts.ping_grace = 1;
    let server = TestServer::spawn_with(config, None)
        .await
        .expect("failed to spawn server");

    let mut client = TestClient::connect(&server.address(), "idler")
        .await
        .expect("failed to connect");
    client.register().await.expect("registration failed");

    let probe = client
        .recv_line_timeout(Duration::from_secs(4))
        .await
        .expect("liveness probe");
    assert_eq!(probe, "PING :debugirc");

    let error = client
        .recv_line_timeout(Duration::from_secs(4))
        .await
        .expect("timeout error line");
    assert_eq!(error, "ERROR: connection timeout");
    assert!(client.expect_close(Duration::from_secs(3)).await);
}

#[tokio::test]
async fn pong_answers_keep_the_session_alive() {
    let mut config = scenario_config();
    config.timeouts.ping_interval = 1;
    config.timeouts.ping_grace = 10;
    let server = TestServer::spawn_with(config, None)
        .await
        .expect("failed to spawn server");

    let mut client = TestClient::connect(&server.address(), "alive")
        .await
        .expect("failed to connect");
    client.register().await.expect("registration failed");

    let probe = client
        .recv_line_timeout(Duration::from_secs(4))
        .await
        .expect("first probe");
    assert_eq!(probe, "PING :debugirc");
    client.send_raw("PONG :debugirc").await.unwrap();

    // The answered probe re-arms the idle timer, so a second probe (not
    // an error) arrives after another idle interval.
    let probe = client
        .recv_line_timeout(Duration::from_secs(4))
        .await
        .expect("second probe");
    assert_eq!(probe, "PING :debugirc");
}
