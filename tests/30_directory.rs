mod common;

use anyhow::Result;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use member_directory::auth::guard;
use member_directory::auth::GuardOutcome;
use member_directory::models::User;
use member_directory::routes::Route;
use member_directory::types::ContactMethod;
use member_directory::views::connection::{FormStatus, MESSAGE_TOO_SHORT, SENT_MESSAGE};
use member_directory::views::directory::{DirectoryScreen, ExpertDirectory};
use member_directory::views::expert_detail::ExpertDetail;

fn listing() -> Value {
    json!([
        {"user_id": 3, "first_name": "Rosa", "last_name": "Diaz", "local_group_name": "Denver",
         "expertise": [{"area_of_expertise": "Law", "what_offering": "Lease reviews"}]},
        {"user_id": 1, "first_name": "Ann", "last_name": "Baker", "local_group_name": "Boston Area",
         "expertise": [{"area_of_expertise": "Finance", "what_offering": "Budgeting help"}]},
        {"user_id": 2, "first_name": "Al", "last_name": "Baker", "local_group_name": "Boston Area",
         "expertise": [{"area_of_expertise": "Law", "what_offering": "Small claims"}]}
    ])
}

async fn logged_in(status: &str) -> Result<common::Backend> {
    let (backend, _) = common::Backend::with_tokens("access-1", Some("refresh-1")).await?;
    let user: User = serde_json::from_value(common::user(5, status, "member", false))?;
    backend.client.session().set_user(Some(user)).await;
    Ok(backend)
}

#[tokio::test]
async fn directory_filters_sort_and_describe_options() -> Result<()> {
    let backend = logged_in("active").await?;
    Mock::given(method("GET"))
        .and(path("/api/users/experts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut view = ExpertDirectory::open(&backend.client).await;
    let ids = |view: &ExpertDirectory| view.visible().iter().map(|e| e.user_id).collect::<Vec<_>>();
    assert_eq!(ids(&view), vec![2, 1, 3]);

    view.set_area(Some("Law".into()));
    assert_eq!(ids(&view), vec![2, 3]);
    view.set_local_group(Some("Boston Area".into()));
    assert_eq!(ids(&view), vec![2]);
    view.clear_filters();
    view.set_keyword(Some("  BUDGET ".into()));
    assert_eq!(ids(&view), vec![1]);

    match view.screen() {
        DirectoryScreen::Listing { page, options, .. } => {
            assert_eq!(page.total_items, 1);
            assert_eq!(options.areas, vec!["Finance", "Law"]);
            assert_eq!(options.local_groups, vec!["Boston Area", "Denver"]);
        }
        other => panic!("unexpected screen {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn pending_accounts_pass_the_route_guard_but_see_the_notice() -> Result<()> {
    let backend = logged_in("pending").await?;
    Mock::given(method("GET"))
        .and(path("/api/users/experts/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .expect(0)
        .mount(&backend.server)
        .await;

    let session = backend.client.session().session().await;
    assert_eq!(guard(&Route::Experts, &session), GuardOutcome::Render(Route::Experts));

    let view = ExpertDirectory::open(&backend.client).await;
    assert!(view.is_pending_verification());
    assert!(matches!(view.screen(), DirectoryScreen::PendingVerification { .. }));
    Ok(())
}

#[tokio::test]
async fn contacting_an_expert_sends_the_trimmed_message() -> Result<()> {
    let backend = logged_in("active").await?;
    Mock::given(method("GET"))
        .and(path("/api/experts/by_user/3/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 30, "user": 3})))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/expertises/by_expert/30/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/connection_requests/"))
        .and(body_json(json!({
            "expert_id": 30,
            "message": "Could you look over my lease?",
            "preferred_contact_method": "video_call"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&backend.server)
        .await;

    let view = ExpertDetail::open(&backend.client, 3).await;
    let mut form = view.connection_form().expect("active members can message");

    form.message = "too short".into();
    assert!(form.submit(&backend.client).await.is_err());
    assert_eq!(form.status(), &FormStatus::Editing { error: Some(MESSAGE_TOO_SHORT.to_string()) });

    form.message = "  Could you look over my lease?  ".into();
    form.preferred_contact_method = Some(ContactMethod::VideoCall);
    form.submit(&backend.client).await?;
    assert_eq!(form.status(), &FormStatus::Sent { confirmation: SENT_MESSAGE });
    Ok(())
}

#[tokio::test]
async fn connection_method_is_optional() -> Result<()> {
    let backend = logged_in("active").await?;
    Mock::given(method("POST"))
        .and(path("/api/connection_requests/"))
        .and(body_json(json!({
            "expert_id": 30,
            "message": "Ten chars!",
            "preferred_contact_method": null
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&backend.server)
        .await;

    let mut form = member_directory::views::connection::ConnectionRequestForm::new(30);
    form.message = "Ten chars!".into();
    form.submit(&backend.client).await?;
    assert!(form.is_sent());
    Ok(())
}
