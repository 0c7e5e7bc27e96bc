mod helpers;

use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, put},
};
use client::{ResourceKind, api::hotels::HotelForm};
use helpers::{Collection, MockApi, auth_routes, memory};
use serde_json::json;
use services::FlowError;
use services::guard::{Navigation, Route};
use util::storage::{LocalStorage, SharedStorage};

const LISTS: [(&str, &str); 8] = [
    ("/users/get-all-users", "/users"),
    ("/tickets/all", "/tickets"),
    ("/visa-applications/get-visa-applications", "/visa-applications"),
    ("/worldcup/matches", "/worldcup/matches"),
    ("/worldcup/predictions/all", "/worldcup/predictions"),
    ("/hotels", "/hotels"),
    ("/hotels/bookings/all", "/hotels/bookings"),
    ("/hotels/transactions/all", "/hotels/transactions"),
];

fn back_office() -> Router {
    LISTS.iter().fold(Router::new(), |router, (list, item)| {
        router.merge(Collection::with_ids(3).routes(list, item))
    })
}

fn admin_storage() -> SharedStorage {
    let storage = memory();
    storage.set_item("token", "jwt-admin").unwrap();
    storage
}

#[tokio::test]
async fn load_all_fills_every_tab_and_the_stats() {
    let routes = back_office().route(
        "/admin/stats",
        get(|| async {
            Json(json!({
                "totalUsers": 5,
                "totalTickets": 12,
                "totalVisaApplications": 3,
                "totalPredictions": 40,
                "totalRevenue": 1520.5,
                "activeMatches": 2
            }))
        }),
    );
    let api = MockApi::spawn(routes).await;
    let ctx = api.context(admin_storage());
    let dashboard = ctx.admin_dashboard();

    let results = dashboard.load_all().await;

    assert_eq!(results.len(), ResourceKind::ALL.len());
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    for tab in dashboard.tabs() {
        let st = tab.list().state().await;
        assert_eq!(st.items.len(), 2, "{}", tab.descriptor().title);
        assert_eq!(st.total_pages, 2);
    }

    let stats = dashboard.stats().await.unwrap();
    assert_eq!(stats.total_users, 5);
    assert_eq!(stats.total_revenue, 1520.5);
    assert_eq!(stats.extra["activeMatches"], 2);

    let admin_calls = api
        .calls_to("/users/get-all-users")
        .into_iter()
        .filter(|c| c.query.as_deref().unwrap_or_default().contains("role=admin"))
        .count();
    assert_eq!(admin_calls, 1);
    let stats_call = &api.calls_to("/admin/stats")[0];
    assert_eq!(stats_call.authorization.as_deref(), Some("Bearer jwt-admin"));
}

#[tokio::test]
async fn failing_stats_do_not_block_the_tabs() {
    let api = MockApi::spawn(back_office()).await;
    let ctx = api.context(admin_storage());
    let dashboard = ctx.admin_dashboard();

    let results = dashboard.load_all().await;

    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert!(dashboard.stats().await.is_none());
    let toasts = ctx.notifications.history().await;
    assert!(toasts.iter().any(|t| t.title == "Failed to load dashboard stats"));
}

#[tokio::test]
async fn hotel_form_is_sent_as_multipart_and_tab_refreshes() {
    let routes = Router::new()
        .route(
            "/hotels",
            get(|| async { Json(json!({"docs": [{"_id": "h1", "name": "Eko Suites"}]})) })
                .post(|| async { (StatusCode::CREATED, Json(json!({"message": "Hotel created"}))) }),
        )
        .route(
            "/hotels/{id}",
            put(|| async { (StatusCode::BAD_REQUEST, Json(json!({"message": "Price must be a number"}))) }),
        );
    let api = MockApi::spawn(routes).await;
    let ctx = api.context(admin_storage());
    let dashboard = ctx.admin_dashboard();

    let form = HotelForm {
        name: "Eko Suites".into(),
        location: "Lagos".into(),
        price: "120".into(),
        description: "Sea view".into(),
        amenities: "wifi, pool".into(),
        featured: true,
        image: None,
    };
    dashboard.save_hotel(None, form.clone()).await.unwrap();

    let create = api
        .calls_to("/hotels")
        .into_iter()
        .find(|c| c.method == "POST")
        .unwrap();
    assert_eq!(create.authorization.as_deref(), Some("Bearer jwt-admin"));
    assert!(create.body.contains("name=\"featured\""));
    assert!(create.body.contains("Eko Suites"));
    assert!(api.calls_to("/hotels").iter().any(|c| c.method == "GET"));
    let hotels = dashboard.tab(ResourceKind::Hotels).unwrap();
    assert_eq!(hotels.list().items().await.len(), 1);

    let err = dashboard
        .save_hotel(Some("h1"), HotelForm { price: "cheap".into(), ..form })
        .await
        .unwrap_err();
    assert_eq!(err, FlowError::Rejected("Price must be a number".into()));
    let last = ctx.notifications.last().await.unwrap();
    assert_eq!(last.title, "Failed to save hotel");
    assert_eq!(last.description.as_deref(), Some("Price must be a number"));
}

#[tokio::test]
async fn navigation_follows_session_role() {
    let user_api = MockApi::spawn(auth_routes("user")).await;
    let ctx = user_api.context(memory());

    assert_eq!(ctx.navigate("/admin"), Navigation::Redirect(Route::Login));
    assert_eq!(ctx.navigate("/dashboard/redeem"), Navigation::Redirect(Route::Login));
    assert_eq!(ctx.navigate("/payment/verify?reference=R1"), Navigation::Render(Route::PaymentVerify));

    ctx.session.login("ada@example.com", "secret1").await.unwrap();
    assert_eq!(ctx.navigate("/admin"), Navigation::Redirect(Route::AdminLogin));
    assert_eq!(ctx.navigate("/dashboard/redeem/"), Navigation::Render(Route::RedeemTicket));

    let admin_api = MockApi::spawn(auth_routes("admin")).await;
    let admin = admin_api.context(memory());
    admin.session.login("ada@example.com", "secret1").await.unwrap();
    assert_eq!(admin.navigate("/admin"), Navigation::Render(Route::Admin));
    assert_eq!(admin.navigate("/admin/login"), Navigation::Redirect(Route::Admin));

    admin.session.logout().await;
    assert_eq!(admin.navigate("/admin"), Navigation::Redirect(Route::Login));
}
