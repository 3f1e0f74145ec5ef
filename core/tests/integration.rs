//! Every accessor against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `UluleClient` with its
//! default `UreqTransport` over real HTTP. Validates that request building,
//! authentication, and response parsing agree with the server's schema.

use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

use mock_server::{AppState, ALICE, BACKED, BOB, FLAGSHIP, FOLLOWED};
use tracing_subscriber::EnvFilter;
use ulule_core::{ApiError, ClientConfig, Credentials, OrderStatus, ProjectFilter, UluleClient};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Start the demo mock server on a random port and return its address.
fn start_server() -> SocketAddr {
    init_logging();

    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener, AppState::demo()).await
        })
        .unwrap();
    });

    addr
}

fn client(addr: SocketAddr, credentials: Credentials) -> UluleClient {
    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}/v1"))
        .with_timeout(Duration::from_secs(5));
    UluleClient::with_config(credentials, config)
}

fn alice(addr: SocketAddr) -> UluleClient {
    client(addr, Credentials::api_key("bloglaurel", "s3cret"))
}

#[test]
fn current_user_resolves_each_credential() {
    let addr = start_server();

    let me = alice(addr).current_user().unwrap();
    assert_eq!(me.id, ALICE);
    assert_eq!(me.username.as_deref(), Some("bloglaurel"));

    let me = client(addr, Credentials::access_token("bob-token")).current_user().unwrap();
    assert_eq!(me.id, BOB);
    assert!(me.email.is_none());

    let err = client(addr, Credentials::Anonymous).current_user().unwrap_err();
    assert_eq!(err.status(), Some(401));

    let err = client(addr, Credentials::basic("bloglaurel", "pw")).current_user().unwrap_err();
    assert_eq!(err.status(), Some(401));
}

#[test]
fn list_projects_by_filter() {
    let addr = start_server();
    let client = alice(addr);

    let ids = |filter| -> Vec<u64> {
        client
            .list_projects(ALICE, filter)
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect()
    };

    assert_eq!(ids(ProjectFilter::Created), vec![FLAGSHIP]);
    assert_eq!(ids(ProjectFilter::Followed), vec![FOLLOWED]);
    assert_eq!(ids(ProjectFilter::Supported), vec![FLAGSHIP, BACKED]);
    assert_eq!(ids(ProjectFilter::All), vec![FLAGSHIP, FOLLOWED, BACKED]);
}

#[test]
fn get_project_and_rewards() {
    let addr = start_server();
    let client = client(addr, Credentials::Anonymous);

    let project = client.get_project(FLAGSHIP).unwrap();
    assert_eq!(project.slug.as_deref(), Some("comme-convenu-2"));
    assert_eq!(project.currency.as_deref(), Some("EUR"));
    assert_eq!(project.goal_raised, Some(true));
    assert!(project.news_count.is_none());

    let descriptions: Vec<&str> = project.rewards.iter().map(|r| r.description()).collect();
    assert_eq!(descriptions, vec!["A thank-you postcard", "Le livre dédicacé"]);

    let rewards = client.list_project_rewards(FLAGSHIP).unwrap();
    assert_eq!(rewards, project.rewards);
    assert_eq!(rewards[1].stock, Some(50));
}

#[test]
fn missing_project_is_an_http_404() {
    let addr = start_server();
    let err = alice(addr).get_project(1).unwrap_err();
    assert!(matches!(err, ApiError::HttpStatus { status: 404, .. }));
}

#[test]
fn find_project_scans_the_user_listing() {
    let addr = start_server();
    let client = alice(addr);

    assert_eq!(client.find_project(ALICE, "demo-followed").unwrap().id, FOLLOWED);
    assert_eq!(client.find_project(ALICE, " 5150 ").unwrap().id, BACKED);
    let err = client.find_project(ALICE, "nope").unwrap_err();
    assert!(matches!(err, ApiError::NotFound(_)));
}

#[test]
fn supporters_paginate_to_the_last_page() {
    let addr = start_server();
    let client = alice(addr);

    let first = client.list_project_supporters(FLAGSHIP, 2, 0).unwrap();
    assert_eq!(first.items.len(), 2);
    assert!(!first.last_page);
    assert_eq!(first.meta.as_ref().and_then(|m| m.total_count), Some(3));

    let second = client.list_project_supporters(FLAGSHIP, 2, 2).unwrap();
    assert_eq!(second.items.len(), 1);
    assert!(second.last_page);

    let all: Vec<u64> = client
        .project_supporter_pages(FLAGSHIP, 2)
        .collect::<ulule_core::Result<Vec<_>>>()
        .unwrap()
        .into_iter()
        .flat_map(|page| page.items)
        .map(|u| u.id)
        .collect();
    assert_eq!(all, vec![BOB, mock_server::CAROL, ALICE]);
}

#[test]
fn project_orders_decode_every_field() {
    let addr = start_server();
    let page = alice(addr).list_project_orders(FLAGSHIP, 20, 0).unwrap();
    assert!(page.last_page);

    let statuses: Vec<_> = page.items.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![
            Some(OrderStatus::Completed),
            Some(OrderStatus::Shipped),
            Some(OrderStatus::Unknown(99))
        ]
    );

    let order = &page.items[0];
    assert_eq!(order.total, Some(29.5));
    assert_eq!(order.items[0].reward_id, Some(101));
    assert_eq!(order.user.as_ref().map(|u| u.id), Some(BOB));
    assert_eq!(
        order.shipping_address.as_ref().and_then(|a| a.postal_code.as_deref()),
        Some("75002")
    );
    assert!(order.billing_address.is_none());
    assert!(order.created_at.is_some());
    assert_eq!(order.project_id, Some(FLAGSHIP));
}

#[test]
fn project_orders_require_credentials() {
    let addr = start_server();
    let err = client(addr, Credentials::Anonymous)
        .list_project_orders(FLAGSHIP, 20, 0)
        .unwrap_err();
    assert!(err.is_client_error());
    assert_eq!(err.status(), Some(401));
}

#[test]
fn user_orders_for_current_user() {
    let addr = start_server();
    let client = alice(addr);

    let me = client.current_user().unwrap();
    let page = client.list_user_orders(Some(&me), 1, 0).unwrap();
    assert_eq!(page.items.len(), 1);
    assert!(!page.last_page);

    let ids: Vec<u64> = client
        .user_order_pages(&me, 1)
        .flat_map(|page| page.unwrap().items)
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec![9003, 9004]);

    let err = client.list_user_orders(None, 20, 0).unwrap_err();
    assert!(matches!(err, ApiError::InvalidArgument(_)));
}

#[test]
fn get_user_is_public() {
    let addr = start_server();
    let user = client(addr, Credentials::Anonymous).get_user(BOB).unwrap();
    assert_eq!(user.username.as_deref(), Some("bob"));
    assert_eq!(user.timezone.as_deref(), Some("Europe/Paris"));
}

#[test]
fn body_over_the_cap_is_a_transport_error() {
    let addr = start_server();
    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}/v1"))
        .with_timeout(Duration::from_secs(5))
        .with_max_body_size(16);
    let err = UluleClient::with_config(Credentials::Anonymous, config)
        .get_project(FLAGSHIP)
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));

    let config = ClientConfig::default()
        .with_base_url(format!("http://{addr}/v1"))
        .with_max_body_size(1 << 20);
    let project = UluleClient::with_config(Credentials::Anonymous, config)
        .get_project(FLAGSHIP)
        .unwrap();
    assert_eq!(project.id, FLAGSHIP);
}

#[test]
fn closed_port_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = alice(addr).get_user(ALICE).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_) | ApiError::Timeout));
}
