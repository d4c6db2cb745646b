use serde_json::json;

use super::common::{TestApp, routes};

#[tokio::test]
async fn only_published_courses_are_listed() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    app.create_course(&admin, "Hidden Draft").await;
    app.create_published_course(&admin, "Visible Course").await;

    let res = app.get_without_token(routes::CATALOG).await;
    assert_eq!(res.status, 200, "{}", res.text);

    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Visible Course");
    assert_eq!(res.body["pagination"]["totalCount"], 1);
}

#[tokio::test]
async fn out_of_range_parameters_are_normalized() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    app.create_published_course(&admin, "Some Course").await;

    let res = app
        .get_without_token(&format!("{}?page=-3&limit=500", routes::CATALOG))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["pagination"]["page"], 1);
    assert_eq!(res.body["pagination"]["limit"], 100);
}

#[tokio::test]
async fn extreme_numeric_parameters_are_tolerated() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    app.create_published_course(&admin, "Ordinary Course").await;

    // A page far past the data is an empty page, not a fault.
    let res = app
        .get_without_token(&format!(
            "{}?page=9223372036854775807&limit=100",
            routes::CATALOG
        ))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["courses"].as_array().unwrap().len(), 0);
    assert_eq!(res.body["pagination"]["totalCount"], 1);

    // A maximal minPrice excludes everything; a maximal maxPrice excludes nothing.
    let res = app
        .get_without_token(&format!(
            "{}?minPrice=9223372036854775807",
            routes::CATALOG
        ))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["courses"].as_array().unwrap().len(), 0);

    let res = app
        .get_without_token(&format!(
            "{}?maxPrice=9223372036854775807",
            routes::CATALOG
        ))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["courses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn unknown_sort_key_falls_back_to_popularity() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    let (quiet_id, _) = app.create_published_course(&admin, "Quiet Course").await;
    let (popular_id, _) = app.create_published_course(&admin, "Popular Course").await;
    let _ = quiet_id;

    let student = app
        .create_authenticated_user("student@example.com", "password123")
        .await;
    app.enroll(popular_id, &student).await;

    let res = app
        .get_without_token(&format!("{}?sortBy=banana", routes::CATALOG))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses[0]["title"], "Popular Course");
    assert_eq!(courses[0]["enrollmentCount"], 1);
}

#[tokio::test]
async fn search_is_case_insensitive_across_text_fields() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    app.create_published_course(&admin, "Introduction to Algorithms")
        .await;
    app.create_published_course(&admin, "Watercolor Painting")
        .await;

    let res = app
        .get_without_token(&format!("{}?search=ALGORITHMS", routes::CATALOG))
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Introduction to Algorithms");
}

#[tokio::test]
async fn average_rating_rounds_to_one_decimal() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Rated Course").await;

    for (i, rating) in [5, 5, 4].iter().enumerate() {
        let token = app
            .create_authenticated_user(&format!("rater{i}@example.com"), "password123")
            .await;
        app.enroll(course_id, &token).await;
        let res = app
            .put_with_token(&routes::review(course_id), &json!({"rating": rating}), &token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    let res = app.get_without_token(routes::CATALOG).await;
    let course = &res.body["courses"][0];
    assert_eq!(course["reviewCount"], 3);
    // Mean of [5, 5, 4] is 4.666..., reported as 4.7.
    assert_eq!(course["averageRating"], 4.7);
}

#[tokio::test]
async fn derived_stats_reflect_enrollments_reviews_and_lessons() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    let (course_id, _) = app.create_published_course(&admin, "Stats Course").await;

    let section_id = app.create_section(course_id, &admin, "Basics").await;
    app.create_lesson(section_id, &admin, "Lesson One").await;
    app.create_lesson(section_id, &admin, "Lesson Two").await;

    let first = app
        .create_authenticated_user("first@example.com", "password123")
        .await;
    let second = app
        .create_authenticated_user("second@example.com", "password123")
        .await;
    app.enroll(course_id, &first).await;
    app.enroll(course_id, &second).await;

    let res = app
        .put_with_token(&routes::review(course_id), &json!({"rating": 5}), &first)
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app.get_without_token(routes::CATALOG).await;
    let course = &res.body["courses"][0];
    assert_eq!(course["enrollmentCount"], 2);
    assert_eq!(course["reviewCount"], 1);
    assert_eq!(course["averageRating"], 5.0);
    assert_eq!(course["totalLessons"], 2);
}

#[tokio::test]
async fn zero_reviews_reports_zero_average() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;
    app.create_published_course(&admin, "Unreviewed Course").await;

    let res = app.get_without_token(routes::CATALOG).await;
    let course = &res.body["courses"][0];
    assert_eq!(course["reviewCount"], 0);
    assert_eq!(course["averageRating"], 0.0);
}

#[tokio::test]
async fn price_sorts_are_monotonic() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    for (title, price) in [("Mid", 3000), ("Cheap", 1000), ("Dear", 5000)] {
        let id = app.create_course(&admin, title).await;
        let res = app
            .patch_with_token(
                &routes::admin_course(id),
                &json!({"price": price, "status": "PUBLISHED"}),
                &admin,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
    }

    let res = app
        .get_without_token(&format!("{}?sortBy=price-low", routes::CATALOG))
        .await;
    let prices: Vec<i64> = res.body["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![1000, 3000, 5000]);

    let res = app
        .get_without_token(&format!("{}?sortBy=price-high", routes::CATALOG))
        .await;
    let prices: Vec<i64> = res.body["courses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["price"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![5000, 3000, 1000]);
}

#[tokio::test]
async fn price_bounds_are_whole_units() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    for (title, price) in [("Cheap", 1000), ("Dear", 5000)] {
        let id = app.create_course(&admin, title).await;
        app.patch_with_token(
            &routes::admin_course(id),
            &json!({"price": price, "status": "PUBLISHED"}),
            &admin,
        )
        .await;
    }

    // minPrice=20 whole units = 2000 cents, so only the 5000-cent course matches.
    let res = app
        .get_without_token(&format!("{}?minPrice=20", routes::CATALOG))
        .await;
    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Dear");

    // Non-positive bounds are ignored.
    let res = app
        .get_without_token(&format!("{}?minPrice=-1&maxPrice=0", routes::CATALOG))
        .await;
    assert_eq!(res.body["courses"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn pagination_metadata_is_consistent() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    for i in 0..3 {
        app.create_published_course(&admin, &format!("Course {i}"))
            .await;
    }

    let res = app
        .get_without_token(&format!("{}?limit=2&sortBy=newest", routes::CATALOG))
        .await;
    assert_eq!(res.body["courses"].as_array().unwrap().len(), 2);
    assert_eq!(res.body["pagination"]["totalCount"], 3);
    assert_eq!(res.body["pagination"]["totalPages"], 2);
    assert_eq!(res.body["pagination"]["hasNext"], true);
    assert_eq!(res.body["pagination"]["hasPrev"], false);

    let res = app
        .get_without_token(&format!("{}?limit=2&page=2&sortBy=newest", routes::CATALOG))
        .await;
    assert_eq!(res.body["courses"].as_array().unwrap().len(), 1);
    assert_eq!(res.body["pagination"]["hasNext"], false);
    assert_eq!(res.body["pagination"]["hasPrev"], true);
}

#[tokio::test]
async fn category_filter_is_exact_and_anded_with_search() {
    let app = TestApp::spawn().await;
    let admin = app.create_admin("admin@example.com", "password123").await;

    app.create_published_course(&admin, "Rust Programming").await;
    let other = app.create_course(&admin, "Rust Sculpture").await;
    let res = app
        .patch_with_token(
            &routes::admin_course(other),
            &json!({"category": "art", "status": "PUBLISHED"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app
        .get_without_token(&format!(
            "{}?search=rust&category=programming",
            routes::CATALOG
        ))
        .await;
    let courses = res.body["courses"].as_array().unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Rust Programming");
}
