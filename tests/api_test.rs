//! End-to-end HTTP flows through the real routes, backed by SQLite and a
//! temp-dir media root.
//!
//! Run with: `cargo test --test api_test`
mod common;

use actix_files::Files;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::{Value, json};

use casting_backend::AppState;
use casting_backend::db::users as user_db;
use common::{Part, multipart_body, multipart_content_type};

macro_rules! init_app {
    ($state:expr, $root:expr) => {{
        let state: AppState = $state.clone();
        test::init_service(
            App::new()
                .configure(move |cfg| state.configure(cfg))
                .service(Files::new("/uploads", $root.to_path_buf())),
        )
        .await
    }};
}

fn register_body(email: &str, role: &str) -> Value {
    json!({
        "userName": "castuser",
        "email": email,
        "password": "Secret1",
        "confirmPassword": "Secret1",
        "role": role,
    })
}

fn personal_body() -> Value {
    json!({
        "fullName": "Asha Verma",
        "whatsapp": "9876543210",
        "calling": "9876543210",
        "shortBio": "Theatre actor from Jaipur.",
        "gender": "female",
        "language": "Hindi",
        "homeCity": "Jaipur",
        "homeState": "Rajasthan",
        "currentCity": "Mumbai",
        "currentState": "Maharashtra",
        "instagram": "https://instagram.com/asha",
        "youtube": "https://youtube.com/@asha",
        "twitter": "https://x.com/asha",
        "linkedin": "https://linkedin.com/in/asha",
    })
}

/// Register, verify with the stored OTP, and log in. Evaluates to the session cookie.
macro_rules! signed_in {
    ($app:expr, $state:expr, $email:expr, $role:expr) => {{
        let email: &str = $email;
        let req = test::TestRequest::post()
            .uri("/api/users/register")
            .set_json(register_body(email, $role))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let user = user_db::get_user_by_email($state.db.get_ref(), email)
            .await
            .unwrap()
            .expect("registered user");
        let otp = user.otp.expect("pending otp");

        let req = test::TestRequest::post()
            .uri("/api/users/verify-otp")
            .set_json(json!({ "email": email, "otp": otp }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/users/login")
            .set_json(json!({ "email": email, "password": "Secret1" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let cookie: Cookie<'static> = resp
            .response()
            .cookies()
            .find(|c| c.name() == "token")
            .expect("session cookie")
            .into_owned();
        cookie
    }};
}

#[actix_web::test]
async fn test_artist_journey_ends_in_listing_with_image_url() {
    let dir = tempfile::tempdir().unwrap();
    let (state, mailer) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());

    let cookie = signed_in!(app, state, "asha@example.com", "artist");
    assert_eq!(mailer.sent().len(), 1);

    // Personal info: created on first submission, plain update afterwards.
    let req = test::TestRequest::post()
        .uri("/api/artist/profile")
        .cookie(cookie.clone())
        .set_json(personal_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let req = test::TestRequest::put()
        .uri("/api/artist/profile")
        .cookie(cookie.clone())
        .set_json(personal_body())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Headshot upload.
    let body = multipart_body(&[Part::File {
        name: "headshot",
        filename: "me.png",
        content_type: "image/png",
        data: common::PNG_BYTES,
    }]);
    let req = test::TestRequest::put()
        .uri("/api/artist/upload")
        .cookie(cookie.clone())
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let user = user_db::get_user_by_email(state.db.get_ref(), "asha@example.com")
        .await
        .unwrap()
        .unwrap();
    let stored = dir.path().join(user.id.to_string()).join("headshot.png");
    assert!(stored.exists());

    // Public listing resolves the stored path to a URL.
    let req = test::TestRequest::get().uri("/api/artist/artists").to_request();
    let artists: Value = test::call_and_read_body_json(&app, req).await;
    let artists = artists.as_array().expect("array");
    assert_eq!(artists.len(), 1);
    assert_eq!(artists[0]["fullName"], "Asha Verma");
    let url = artists[0]["photos"]["headshot"].as_str().expect("headshot url");
    assert_eq!(
        url,
        format!("{}/{}/headshot.png", common::MEDIA_BASE_URL, user.id)
    );

    // ...and that URL is actually served.
    let path = url.trim_start_matches("http://localhost:8080");
    let req = test::TestRequest::get().uri(path).to_request();
    let bytes = test::call_and_read_body(&app, req).await;
    assert_eq!(bytes.as_ref(), common::PNG_BYTES);
}

#[actix_web::test]
async fn test_uploading_one_slot_keeps_others_and_retires_old_type() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let cookie = signed_in!(app, state, "slots@example.com", "artist");

    let req = test::TestRequest::post()
        .uri("/api/artist/profile")
        .cookie(cookie.clone())
        .set_json(personal_body())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let upload = |parts: Vec<Part<'static>>| {
        test::TestRequest::put()
            .uri("/api/artist/upload")
            .cookie(cookie.clone())
            .insert_header(("content-type", multipart_content_type()))
            .set_payload(multipart_body(&parts))
            .to_request()
    };

    let req = upload(vec![
        Part::File {
            name: "headshot",
            filename: "a.png",
            content_type: "image/png",
            data: common::PNG_BYTES,
        },
        Part::File {
            name: "fullBody",
            filename: "b.jpg",
            content_type: "image/jpeg",
            data: common::JPEG_BYTES,
        },
    ]);
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = upload(vec![Part::File {
        name: "headshot",
        filename: "c.jpg",
        content_type: "image/jpeg",
        data: common::JPEG_BYTES,
    }]);
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let photos = &body["photos"];
    assert!(photos["headshot"].as_str().unwrap().ends_with("/headshot.jpg"));
    assert!(photos["fullBody"].as_str().unwrap().ends_with("/fullBody.jpg"));

    let user = user_db::get_user_by_email(state.db.get_ref(), "slots@example.com")
        .await
        .unwrap()
        .unwrap();
    let owner_dir = dir.path().join(user.id.to_string());
    assert!(owner_dir.join("headshot.jpg").exists());
    assert!(owner_dir.join("fullBody.jpg").exists());
    assert!(!owner_dir.join("headshot.png").exists());

    // Wrong type for a slot is a validation error and stores nothing.
    let req = upload(vec![Part::File {
        name: "profile",
        filename: "x.pdf",
        content_type: "application/pdf",
        data: common::PDF_BYTES,
    }]);
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["profile"].is_array());
    assert!(!owner_dir.join("profile.pdf").exists());
}

#[actix_web::test]
async fn test_sections_require_personal_info_first() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let cookie = signed_in!(app, state, "early@example.com", "artist");

    let req = test::TestRequest::put()
        .uri("/api/artist/professional")
        .cookie(cookie.clone())
        .set_json(json!({
            "talentCategory": "Actor",
            "height": "170 cm",
            "age": 25,
            "screenAge": 22,
            "videoReel": "https://youtube.com/watch?v=1",
            "skills": ["Dance"],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::put()
        .uri("/api/artist/monologue")
        .cookie(cookie.clone())
        .set_json(json!({ "haryanvi": "https://youtube.com/h" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_logout_revokes_the_session() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let cookie = signed_in!(app, state, "bye@example.com", "artist");

    let req = test::TestRequest::get()
        .uri("/api/users/getDetails")
        .cookie(cookie.clone())
        .to_request();
    let details: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(details["email"], "bye@example.com");
    assert!(details.get("passwordHash").is_none());

    let req = test::TestRequest::post()
        .uri("/api/users/logout")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    // The old credential no longer works, via cookie or bearer header.
    let req = test::TestRequest::get()
        .uri("/api/users/getDetails")
        .cookie(cookie.clone())
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
    let req = test::TestRequest::get()
        .uri("/api/users/getDetails")
        .insert_header(("authorization", format!("Bearer {}", cookie.value())))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNAUTHORIZED
    );
}

#[actix_web::test]
async fn test_registration_errors() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());

    let mut weak = register_body("weak@example.com", "artist");
    weak["password"] = json!("password");
    weak["confirmPassword"] = json!("different");
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(weak)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["password"].is_array());
    assert!(body["errors"]["confirmPassword"].is_array());

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(register_body("dup@example.com", "director"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(register_body("DUP@example.com", "director"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    // Malformed JSON answers like any validation error.
    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_wrong_otp_and_second_verification() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());

    let req = test::TestRequest::post()
        .uri("/api/users/register")
        .set_json(register_body("otp@example.com", "artist"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    let user = user_db::get_user_by_email(state.db.get_ref(), "otp@example.com")
        .await
        .unwrap()
        .unwrap();
    let otp = user.otp.clone().unwrap();
    let wrong = if otp == "000000" { "111111" } else { "000000" };

    let req = test::TestRequest::post()
        .uri("/api/users/verify-otp")
        .set_json(json!({ "email": "otp@example.com", "otp": wrong }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "INVALID_OTP");

    let req = test::TestRequest::post()
        .uri("/api/users/verify-otp")
        .set_json(json!({ "email": "otp@example.com", "otp": otp }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/api/users/verify-otp")
        .set_json(json!({ "email": "otp@example.com", "otp": otp }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], "ALREADY_VERIFIED");

    let req = test::TestRequest::post()
        .uri("/api/users/resend-otp")
        .set_json(json!({ "email": "otp@example.com" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

/// Every text part and both banners of a valid create request, with
/// `overrides` replacing individual text values.
fn project_parts(overrides: &[(&'static str, &'static str)]) -> Vec<Part<'static>> {
    let text = [
        ("projectName", "Desert Song"),
        ("typeOfProject", "film"),
        ("description", "A feature film shot in Rajasthan."),
        ("castingStart", "2026-11-01"),
        ("castingEnd", "2026-11-01"),
        ("castingCity", "Jaipur"),
        ("castingState", "Rajasthan"),
        ("castingCountry", "India"),
        ("shootingStart", "2026-12-01"),
        ("shootingEnd", "2026-12-20"),
        ("shootingCity", "Jaisalmer"),
        ("shootingState", "Rajasthan"),
        ("shootingCountry", "India"),
        ("role", "Lead"),
        ("gender", "Female"),
        ("ageRange", "18-25"),
        ("language", "Hindi"),
    ];
    let mut parts: Vec<Part<'static>> = text
        .iter()
        .map(|&(k, v)| {
            let v = overrides
                .iter()
                .find(|(name, _)| *name == k)
                .map_or(v, |&(_, value)| value);
            Part::Text(k, v)
        })
        .collect();
    parts.push(Part::File {
        name: "bannerImage",
        filename: "banner.webp",
        content_type: "image/webp",
        data: common::PNG_BYTES,
    });
    parts.push(Part::File {
        name: "bannerPdf",
        filename: "brief.pdf",
        content_type: "application/pdf",
        data: common::PDF_BYTES,
    });
    parts
}

#[actix_web::test]
async fn test_director_project_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let director = signed_in!(app, state, "director@example.com", "director");
    let artist = signed_in!(app, state, "artist@example.com", "artist");

    let create_body = multipart_body(&project_parts(&[]));

    // Artists cannot publish projects.
    let req = test::TestRequest::post()
        .uri("/api/project/create")
        .cookie(artist.clone())
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(create_body.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::post()
        .uri("/api/project/create")
        .cookie(director.clone())
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(create_body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["project"]["id"].as_str().unwrap().to_string();
    assert_eq!(
        body["project"]["bannerImage"],
        format!("{}/{id}/bannerImage.webp", common::MEDIA_BASE_URL)
    );
    assert!(dir.path().join(&id).join("bannerPdf.pdf").exists());

    // Update only the dates: shooting end before start is rejected.
    let req = test::TestRequest::put()
        .uri(&format!("/api/project/update/{id}"))
        .cookie(director.clone())
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&[Part::Text("shootingEnd", "2026-11-15")]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["shootingEnd"].is_array());

    // Replace only the banner image with a JPEG.
    let req = test::TestRequest::put()
        .uri(&format!("/api/project/update/{id}"))
        .cookie(director.clone())
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&[
            Part::Text("role", "Supporting"),
            Part::File {
                name: "bannerImage",
                filename: "new.jpg",
                content_type: "image/jpeg",
                data: common::JPEG_BYTES,
            },
        ]))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["project"]["role"], "Supporting");
    assert!(body["project"]["bannerImage"].as_str().unwrap().ends_with("/bannerImage.jpg"));
    assert!(body["project"]["bannerPdf"].as_str().unwrap().ends_with("/bannerPdf.pdf"));
    assert!(!dir.path().join(&id).join("bannerImage.webp").exists());

    let req = test::TestRequest::get().uri("/api/project/projects").to_request();
    let projects: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(projects.as_array().unwrap().len(), 1);

    // Only the creator may delete.
    let req = test::TestRequest::delete()
        .uri(&format!("/api/project/{id}"))
        .cookie(artist.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/project/{id}"))
        .cookie(director.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert!(!dir.path().join(&id).join("bannerImage.jpg").exists());
    assert!(!dir.path().join(&id).join("bannerPdf.pdf").exists());

    let req = test::TestRequest::get()
        .uri(&format!("/api/project/{id}"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/api/project/not-a-uuid").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_project_create_requires_both_banners() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let director = signed_in!(app, state, "dir2@example.com", "director");

    let req = test::TestRequest::post()
        .uri("/api/project/create")
        .cookie(director)
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&[
            Part::Text("projectName", "Untitled"),
            Part::File {
                name: "bannerImage",
                filename: "banner.png",
                content_type: "image/png",
                data: common::PNG_BYTES,
            },
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["bannerPdf"].is_array());

    // Nothing was left behind in the storage root.
    let mut entries = std::fs::read_dir(dir.path()).unwrap();
    assert!(entries.next().is_none());
}

#[actix_web::test]
async fn test_project_create_rejects_casting_end_before_start() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let director = signed_in!(app, state, "dir3@example.com", "director");

    let parts = project_parts(&[("castingStart", "2026-11-10"), ("castingEnd", "2026-11-01")]);
    let req = test::TestRequest::post()
        .uri("/api/project/create")
        .cookie(director)
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&parts))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["errors"]["castingEnd"].is_array());

    // Both banners were received, yet no file or directory survives the rejection.
    let mut entries = std::fs::read_dir(dir.path()).unwrap();
    assert!(entries.next().is_none());

    let req = test::TestRequest::get().uri("/api/project/projects").to_request();
    let projects: Value = test::call_and_read_body_json(&app, req).await;
    assert!(projects.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_project_update_cannot_blank_required_fields() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());
    let director = signed_in!(app, state, "dir4@example.com", "director");

    let req = test::TestRequest::post()
        .uri("/api/project/create")
        .cookie(director.clone())
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&project_parts(&[])))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["project"]["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::put()
        .uri(&format!("/api/project/update/{id}"))
        .cookie(director)
        .insert_header(("content-type", multipart_content_type()))
        .set_payload(multipart_body(&[
            Part::Text("role", ""),
            Part::Text("castingCity", ""),
            Part::Text("language", ""),
        ]))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["errors"]["role"].is_array());
    assert!(body["errors"]["castingCity"].is_array());
    assert!(body["errors"]["language"].is_array());

    let req = test::TestRequest::get()
        .uri(&format!("/api/project/{id}"))
        .to_request();
    let project: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(project["role"], "Lead");
    assert_eq!(project["castingCity"], "Jaipur");
}

#[actix_web::test]
async fn test_listing_with_out_of_range_page_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (state, _) = common::test_state(dir.path()).await;
    let app = init_app!(state, dir.path());

    for limit in ["1", "100"] {
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/artist/artists?page=18446744073709551615&limit={limit}"
            ))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!([]));
    }
}
