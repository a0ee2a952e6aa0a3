//! Basket route handler.
//!
//! A basket is only returned to its owner, but any attempt to open a basket
//! other than the caller's own is reported to the challenge registry, whether
//! or not the lookup found anything.

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use juice_shop_core::{BasketId, ChallengeKey};

use super::ApiResponse;
use crate::db::{BasketRepository, BasketStore};
use crate::error::{AppError, Result};
use crate::middleware::{AuthenticatedUser, RequestLocale};
use crate::models::{Basket, CurrentUser};
use crate::services::{ChallengeRegistry, Locale, Translator};
use crate::state::AppState;

/// Body of the 404 for unknown or foreign baskets.
pub const BASKET_NOT_FOUND: &str = "Basket not found or access denied.";

/// Ids the front end sends when it has no basket to ask for.
const PLACEHOLDER_IDS: [&str; 3] = ["undefined", "null", "NaN"];

/// Show a basket with its products.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    RequestLocale(locale): RequestLocale,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Basket>>> {
    let store = BasketRepository::new(state.pool());
    let basket = retrieve(
        &store,
        state.challenges(),
        state.translator(),
        &locale,
        &user,
        &id,
    )
    .await?;

    Ok(Json(ApiResponse::success(basket)))
}

/// Look up `id` for `user`, report foreign-basket attempts, and localize the
/// product names.
///
/// # Errors
///
/// Returns `AppError::NotFound` if `id` names no basket owned by `user` and
/// `AppError::Database` if the lookup fails.
pub async fn retrieve<S: BasketStore>(
    store: &S,
    challenges: &ChallengeRegistry,
    translator: &Translator,
    locale: &Locale,
    user: &CurrentUser,
    id: &str,
) -> Result<Basket> {
    // An id that is not an integer cannot match a row.
    let found = match id.parse::<BasketId>() {
        Ok(basket_id) => store.find_owned_with_products(basket_id, user.id).await?,
        Err(_) => None,
    };

    challenges.solve_if(ChallengeKey::BasketAccessChallenge, || {
        is_foreign_basket_request(user, id)
    });

    let mut basket = found.ok_or_else(|| AppError::NotFound(BASKET_NOT_FOUND.to_string()))?;
    basket.rename_products(|name| translator.translate(name, locale));
    Ok(basket)
}

/// Whether `id` asks for some basket other than the one assigned at login.
///
/// Numeric ids are compared by value (`"07"` and `"7.0"` both name basket 7);
/// any other id differs from every basket.
#[allow(clippy::float_cmp)]
fn is_foreign_basket_request(user: &CurrentUser, id: &str) -> bool {
    let Some(bid) = user.bid else {
        return false;
    };
    if id.is_empty() || PLACEHOLDER_IDS.contains(&id) {
        return false;
    }

    match id.trim().parse::<f64>() {
        Ok(requested) if requested.is_finite() => requested != f64::from(bid.as_i32()),
        _ => true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use juice_shop_core::{Email, UserId};

    use super::*;
    use crate::db::RepositoryError;
    use crate::models::basket::tests::sample_basket;
    use crate::services::i18n::tests::german_translator;
    use crate::state::tests::test_state;

    /// In-memory baskets that count lookups.
    struct MemoryStore {
        baskets: Vec<Basket>,
        lookups: AtomicUsize,
    }

    impl MemoryStore {
        fn new(baskets: Vec<Basket>) -> Self {
            Self {
                baskets,
                lookups: AtomicUsize::new(0),
            }
        }

        fn lookups(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl BasketStore for MemoryStore {
        fn find_owned_with_products(
            &self,
            id: BasketId,
            owner: UserId,
        ) -> impl Future<Output = std::result::Result<Option<Basket>, RepositoryError>> + Send
        {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            let found = self
                .baskets
                .iter()
                .find(|b| b.id == id && b.user_id == owner)
                .cloned();
            async move { Ok(found) }
        }
    }

    struct FailingStore;

    impl BasketStore for FailingStore {
        async fn find_owned_with_products(
            &self,
            _id: BasketId,
            _owner: UserId,
        ) -> std::result::Result<Option<Basket>, RepositoryError> {
            Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
        }
    }

    fn user(id: i32, bid: Option<i32>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            email: Email::parse("jim@juice-sh.op").unwrap(),
            bid: bid.map(BasketId::new),
        }
    }

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::new(vec![
            sample_basket(1, 1, &["Apple Juice (1000ml)", "Banana Juice (1000ml)"]),
            sample_basket(2, 2, &["Apple Juice (1000ml)"]),
        ])
    }

    #[tokio::test]
    async fn test_owner_gets_basket_without_challenge() {
        let store = store();
        let challenges = ChallengeRegistry::new();
        let translator = Translator::identity(locale("en"));

        let basket = retrieve(&store, &challenges, &translator, &locale("en"), &user(1, Some(1)), "1")
            .await
            .unwrap();

        assert_eq!(basket.id, BasketId::new(1));
        assert_eq!(basket.products.len(), 2);
        assert!(!challenges.is_solved(ChallengeKey::BasketAccessChallenge));
    }

    #[tokio::test]
    async fn test_product_names_are_translated() {
        let store = store();
        let challenges = ChallengeRegistry::new();

        let basket = retrieve(
            &store,
            &challenges,
            &german_translator(),
            &locale("de_DE"),
            &user(1, Some(1)),
            "1",
        )
        .await
        .unwrap();

        let names: Vec<_> = basket.products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Apfelsaft (1000ml)", "Bananensaft (1000ml)"]);
    }

    #[tokio::test]
    async fn test_foreign_basket_is_not_found_but_solves_challenge() {
        let store = store();
        let challenges = ChallengeRegistry::new();
        let translator = Translator::identity(locale("en"));

        let err = retrieve(&store, &challenges, &translator, &locale("en"), &user(1, Some(1)), "2")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref msg) if msg == BASKET_NOT_FOUND));
        assert!(challenges.is_solved(ChallengeKey::BasketAccessChallenge));
    }

    #[tokio::test]
    async fn test_non_numeric_id_is_not_found_without_lookup() {
        let store = store();
        let challenges = ChallengeRegistry::new();
        let translator = Translator::identity(locale("en"));

        let err = retrieve(
            &store,
            &challenges,
            &translator,
            &locale("en"),
            &user(1, Some(1)),
            "1 OR 1=1",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.lookups(), 0);
        assert!(challenges.is_solved(ChallengeKey::BasketAccessChallenge));
    }

    #[tokio::test]
    async fn test_storage_error_is_server_error() {
        let challenges = ChallengeRegistry::new();
        let translator = Translator::identity(locale("en"));

        let err = retrieve(
            &FailingStore,
            &challenges,
            &translator,
            &locale("en"),
            &user(1, Some(1)),
            "1",
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_foreign_request_compares_numerically() {
        let jim = user(1, Some(7));

        assert!(!is_foreign_basket_request(&jim, "7"));
        assert!(!is_foreign_basket_request(&jim, "07"));
        assert!(!is_foreign_basket_request(&jim, "7.0"));
        assert!(is_foreign_basket_request(&jim, "8"));
        assert!(is_foreign_basket_request(&jim, "seven"));
    }

    #[test]
    fn test_foreign_request_ignores_placeholders() {
        let jim = user(1, Some(7));

        for id in ["", "undefined", "null", "NaN"] {
            assert!(!is_foreign_basket_request(&jim, id), "{id:?}");
        }
        assert!(!is_foreign_basket_request(&user(1, None), "8"));
    }

    #[tokio::test]
    async fn test_anonymous_request_is_unauthorized() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());
        let app: Router = super::super::routes().with_state(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rest/basket/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], crate::error::LOGIN_REQUIRED);
        assert!(!state.challenges().is_solved(ChallengeKey::BasketAccessChallenge));
    }
}
