#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{schema::Schema, PathItemType, RefOr};
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();

        assert!(openapi.components.is_some());
        let components = openapi.components.as_ref().unwrap();

        for name in [
            "ErrorResponse",
            "HealthResponse",
            "FieldError",
            "Movie",
            "Genre",
            "Director",
            "UserDto",
            "RegisterRequest",
            "UpdateProfileRequest",
            "LoginRequest",
            "LoginResponse",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        let error_response_schema = components.schemas.get("ErrorResponse").unwrap();

        if let RefOr::T(Schema::Object(obj)) = error_response_schema {
            let properties = &obj.properties;
            assert!(properties.contains_key("error"));
            assert!(properties.contains_key("code"));
            assert!(properties.contains_key("success"));
            assert!(properties.contains_key("details"));
        } else {
            panic!("ErrorResponse should be an object schema");
        }
    }

    #[test]
    fn test_user_schema_has_no_password() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();

        if let RefOr::T(Schema::Object(obj)) = components.schemas.get("UserDto").unwrap() {
            assert!(obj.properties.contains_key("username"));
            assert!(obj.properties.contains_key("favorite_movie_ids"));
            assert!(!obj.properties.keys().any(|k| k.contains("password")));
        } else {
            panic!("UserDto should be an object schema");
        }
    }

    #[test]
    fn test_every_route_is_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let expected = [
            ("/", "GET", PathItemType::Get),
            ("/health", "GET", PathItemType::Get),
            ("/login", "POST", PathItemType::Post),
            ("/movies", "GET", PathItemType::Get),
            ("/movies/{title}", "GET", PathItemType::Get),
            ("/movies/genre/{name}", "GET", PathItemType::Get),
            ("/movies/director/{name}", "GET", PathItemType::Get),
            ("/users", "POST", PathItemType::Post),
            ("/users", "GET", PathItemType::Get),
            ("/users/{username}", "GET", PathItemType::Get),
            ("/users/{username}", "PUT", PathItemType::Put),
            ("/users/{username}", "DELETE", PathItemType::Delete),
            ("/users/{username}/movies/{movie_id}", "POST", PathItemType::Post),
            ("/users/{username}/movies/{movie_id}", "DELETE", PathItemType::Delete),
        ];
        for (path, label, method) in expected {
            let item = paths
                .get(path)
                .unwrap_or_else(|| panic!("missing path {}", path));
            assert!(item.operations.contains_key(&method), "missing {} {}", label, path);
        }
    }

    #[test]
    fn test_error_responses_reference_error_schema() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let error_ref = |path: &str, method: &str, status: &str| {
            json["paths"][path][method]["responses"][status]["content"]["application/json"]
                ["schema"]["$ref"]
                .clone()
        };

        for (path, method, status) in [
            ("/login", "post", "401"),
            ("/movies/{title}", "get", "404"),
            ("/users", "post", "409"),
            ("/users/{username}/movies/{movie_id}", "post", "422"),
            ("/users/{username}/movies/{movie_id}", "delete", "422"),
        ] {
            assert_eq!(
                error_ref(path, method, status),
                "#/components/schemas/ErrorResponse",
                "{} {} {}",
                method,
                path,
                status
            );
        }
    }

    #[test]
    fn test_protected_operations_declare_bearer_auth() {
        let openapi = ApiDoc::openapi();
        let json = serde_json::to_value(&openapi).unwrap();

        assert!(json["components"]["securitySchemes"]["bearer_auth"].is_object());
        assert!(json["paths"]["/movies"]["get"]["security"].is_array());
        assert!(json["paths"]["/login"]["post"].get("security").is_none());
        assert!(json["paths"]["/users"]["post"].get("security").is_none());
    }
}
