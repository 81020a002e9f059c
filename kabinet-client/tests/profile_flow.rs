//! View-model flow tests: aggregate load, the mutation wrapper's refetch
//! and its error localization.

use httpmock::prelude::*;
use kabinet_client::{ApiClient, AuthApi, ProfileViewModel, UsersApi};
use kabinet_model::UpdateProfileRequest;
use serde_json::json;

fn view_model(server: &MockServer) -> ProfileViewModel {
    let client = ApiClient::new(server.base_url());
    let auth = AuthApi::new(client.clone());
    let users = UsersApi::new(client.clone());
    ProfileViewModel::new(auth, users)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "ivan",
        "email": "ivan@example.com",
        "isActive": true,
        "createdAt": "2024-01-15T00:00:00Z",
        "updatedAt": "2024-01-15T00:00:00Z"
    })
}

fn profile_json(first_name: Option<&str>, last_name: Option<&str>) -> serde_json::Value {
    json!({
        "id": 1,
        "firstName": first_name,
        "lastName": last_name,
        "createdAt": "2024-01-15T00:00:00Z",
        "updatedAt": "2024-01-15T00:00:00Z"
    })
}

#[tokio::test]
async fn load_exposes_names_and_no_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/me");
            then.status(200).json_body(user_json());
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/profile");
            then.status(200)
                .json_body(profile_json(Some("Иван"), Some("Петров")));
        })
        .await;

    let mut vm = view_model(&server);
    vm.load().await;

    assert!(vm.error().is_none());
    assert!(!vm.is_loading());
    assert_eq!(vm.full_name(), "Иван Петров");
    assert_eq!(vm.initials(), "ИП");
    assert!(!vm.has_avatar());
}

#[tokio::test]
async fn failed_reads_surface_unlocalized_and_flag_the_empty_screen() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/me");
            then.status(401).json_body(json!({ "message": "Unauthorized" }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/profile");
            then.status(401).json_body(json!({ "message": "Unauthorized" }));
        })
        .await;

    let mut vm = view_model(&server);
    vm.load().await;

    assert!(vm.is_empty_failure());
    let error = vm.error().expect("fetch error is surfaced");
    assert!(error.contains("401"));
    // Without a profile or user the display falls back to the literal.
    assert_eq!(vm.full_name(), "Пользователь");
    assert_eq!(vm.initials(), "П");
}

#[tokio::test]
async fn successful_mutation_refetches_the_profile() {
    let server = MockServer::start_async().await;
    let update_mock = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/user/profile")
                .json_body(json!({ "firstName": "Анна" }));
            then.status(200).json_body(profile_json(Some("Анна"), None));
        })
        .await;
    let profile_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/user/profile");
            then.status(200).json_body(profile_json(Some("Анна"), None));
        })
        .await;

    let mut vm = view_model(&server);
    vm.update_profile(UpdateProfileRequest {
        first_name: Some("Анна".to_string()),
        ..Default::default()
    })
    .await
    .expect("update profile");

    assert!(vm.error().is_none());
    assert_eq!(vm.full_name(), "Анна");

    update_mock.assert_async().await;
    // The wrapper refetches the read it just invalidated.
    profile_mock.assert_async().await;
}

#[tokio::test]
async fn mutation_error_prefers_the_server_message() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/user/profile");
            then.status(400)
                .json_body(json!({ "message": "Дата рождения некорректна" }));
        })
        .await;

    let mut vm = view_model(&server);
    let err = vm
        .update_profile(UpdateProfileRequest::default())
        .await
        .expect_err("update must fail");

    assert_eq!(err.server_message(), Some("Дата рождения некорректна"));
    assert_eq!(vm.error(), Some("Дата рождения некорректна"));
    assert!(!vm.is_loading());
}

#[tokio::test]
async fn mutation_error_without_server_message_uses_the_fixed_fallback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT).path("/user/profile");
            then.status(500);
        })
        .await;

    let mut vm = view_model(&server);
    let err = vm
        .update_profile(UpdateProfileRequest::default())
        .await
        .expect_err("update must fail");

    assert!(err.server_message().is_none());
    assert_eq!(vm.error(), Some("Ошибка при обновлении профиля"));
}

#[tokio::test]
async fn next_mutation_clears_the_previous_error() {
    let server = MockServer::start_async().await;
    let failing = server
        .mock_async(|when, then| {
            when.method(PUT).path("/user/profile");
            then.status(500);
        })
        .await;

    let mut vm = view_model(&server);
    let _ = vm.update_profile(UpdateProfileRequest::default()).await;
    assert!(vm.error().is_some());
    failing.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(PUT).path("/user/profile");
            then.status(200).json_body(profile_json(Some("Анна"), None));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/user/profile");
            then.status(200).json_body(profile_json(Some("Анна"), None));
        })
        .await;

    vm.update_profile(UpdateProfileRequest {
        first_name: Some("Анна".to_string()),
        ..Default::default()
    })
    .await
    .expect("second attempt succeeds");
    assert!(vm.error().is_none());
}
