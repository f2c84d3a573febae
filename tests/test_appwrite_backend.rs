use mockito::Matcher;
use savory_stories::{
    AppConfig, AppError, AppwriteBackend, Difficulty, ListOptions, NewAccount, Recipe,
    RecipeBackend,
};
use serde_json::{json, Map};

fn test_config(endpoint: &str) -> AppConfig {
    AppConfig {
        endpoint: endpoint.to_string(),
        project_id: "savory".to_string(),
        database_id: "main".to_string(),
        recipes_collection_id: "recipes".to_string(),
        timeout: 5,
        list_limit: 20,
        featured_limit: 4,
    }
}

const DOCUMENTS_PATH: &str = "/databases/main/collections/recipes/documents";

#[tokio::test]
async fn test_fetch_collection_maps_documents() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "total": 2,
        "documents": [
            {
                "$id": "soup",
                "$createdAt": "2024-02-01T00:00:00.000+00:00",
                "$permissions": [],
                "title": "Tomato Soup",
                "description": "Warm",
                "imageUrl": "https://example.com/soup.jpg",
                "ingredients": "[\"tomatoes\",\"basil\"]",
                "instructions": "Chop, Simmer",
                "difficultyLevel": "easy",
                "servings": 4,
                "category": "Soup",
                "rating": 4.2,
                "totalRatings": 10
            },
            {
                "$id": "pie",
                "$createdAt": "2024-01-01T00:00:00.000+00:00",
                "title": "Apple Pie",
                "category": "Dessert"
            }
        ]
    });

    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_header("x-appwrite-project", "savory")
        .match_query(Matcher::AllOf(vec![
            Matcher::Regex("orderDesc".to_string()),
            Matcher::Regex("limit".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let records = backend
        .fetch_collection(&ListOptions::newest(20))
        .await
        .unwrap();
    let recipes: Vec<Recipe> = records.into_iter().map(Recipe::from).collect();

    assert_eq!(recipes.len(), 2);
    assert_eq!(recipes[0].id, "soup");
    assert_eq!(recipes[0].image, "https://example.com/soup.jpg");
    assert_eq!(recipes[0].ingredients, vec!["tomatoes", "basil"]);
    assert_eq!(recipes[0].instructions, vec!["Chop", "Simmer"]);
    assert_eq!(recipes[0].difficulty_level, Some(Difficulty::Easy));
    assert_eq!(recipes[0].created_at, "2024-02-01T00:00:00.000+00:00");
    assert_eq!(recipes[1].title, "Apple Pie");
    assert!(recipes[1].ingredients.is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_collection_service_error() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(500)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Server Error", "code": 500, "type": "general_unknown"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let result = backend.fetch_collection(&ListOptions::newest(20)).await;

    match result {
        Err(AppError::Service { code, message }) => {
            assert_eq!(code, 500);
            assert_eq!(message, "Server Error");
        }
        other => panic!("Expected service error, got {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_by_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", format!("{}/pie", DOCUMENTS_PATH).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"$id": "pie", "$createdAt": "2024-01-01", "title": "Apple Pie", "servings": "8"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let recipe = Recipe::from(backend.fetch_by_id("pie").await.unwrap());

    assert_eq!(recipe.title, "Apple Pie");
    assert_eq!(recipe.servings, Some(8));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_by_id_not_found() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", format!("{}/missing", DOCUMENTS_PATH).as_str())
        .with_status(404)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Document with the requested ID could not be found.", "code": 404, "type": "document_not_found"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let result = backend.fetch_by_id("missing").await;

    assert!(matches!(result, Err(AppError::NotFound(id)) if id == "missing"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_current_session_without_session() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/account")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "User (role: guests) missing scope (account)", "code": 401, "type": "general_unauthorized_scope"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let result = backend.current_session().await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_record_without_session_is_unauthorized() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", DOCUMENTS_PATH)
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "The current user is not authorized to perform the requested action.", "code": 401, "type": "user_unauthorized"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let result = backend.create_record(Map::new()).await;

    assert!(matches!(result, Err(AppError::Unauthorized)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_document_list_is_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"total": 1, "documents": [{"title": "No id"}]}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let result = backend.fetch_collection(&ListOptions::newest(20)).await;

    assert!(matches!(result, Err(AppError::InvalidResponse(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_by_id_rejects_dot_segments() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", DOCUMENTS_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    for id in ["..", ".", ""] {
        let result = backend.fetch_by_id(id).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_login_creates_session_then_reads_account() {
    let mut server = mockito::Server::new_async().await;
    let session = server
        .mock("POST", "/account/sessions/email")
        .match_body(Matcher::Json(json!({
            "email": "ada@example.com",
            "password": "secret"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_header("set-cookie", "a_session_savory=token; Path=/; HttpOnly")
        .with_body(r#"{"$id": "s1", "userId": "u1"}"#)
        .create_async()
        .await;
    let account = server
        .mock("GET", "/account")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"$id": "u1", "name": "Ada", "email": "ada@example.com"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let user = backend.login("ada@example.com", "secret").await.unwrap();

    assert_eq!(user.id, "u1");
    assert_eq!(user.name, "Ada");
    session.assert_async().await;
    account.assert_async().await;
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/account/sessions/email")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "Invalid credentials. Please check the email and password.", "code": 401, "type": "user_invalid_credentials"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let error = backend.login("ada@example.com", "wrong").await.unwrap_err();

    assert!(error.to_string().contains("Invalid credentials"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_signup_posts_unique_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/account")
        .match_body(Matcher::PartialJson(json!({
            "userId": "unique()",
            "email": "grace@example.com",
            "name": "Grace"
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"$id": "u2", "name": "Grace", "email": "grace@example.com"}"#)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let user = backend
        .signup(&NewAccount {
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            password: "hopper123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, "u2");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_logout_accepts_empty_response() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/account/sessions/current")
        .with_status(204)
        .create_async()
        .await;

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    backend.logout().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_create_record() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", DOCUMENTS_PATH)
        .match_body(Matcher::PartialJson(json!({
            "documentId": "unique()",
            "data": {"title": "Pancakes"}
        })))
        .with_status(201)
        .with_header("content-type", "application/json")
        .with_body(r#"{"$id": "new1", "$createdAt": "2024-06-01", "title": "Pancakes", "ingredients": "flour, milk"}"#)
        .create_async()
        .await;

    let mut fields = Map::new();
    fields.insert("title".to_string(), json!("Pancakes"));
    fields.insert("ingredients".to_string(), json!("flour, milk"));

    let backend = AppwriteBackend::new(&test_config(&server.url())).unwrap();
    let recipe = Recipe::from(backend.create_record(fields).await.unwrap());

    assert_eq!(recipe.id, "new1");
    assert_eq!(recipe.ingredients, vec!["flour", "milk"]);
    mock.assert_async().await;
}
