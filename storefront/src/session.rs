//! The shopper's session.
//!
//! A [`Session`] is the explicit context object the presentation layer
//! holds: it owns the cart and auth stores plus every collaborator they
//! talk to. Starting one wires everything up; [`Session::end`] shuts the
//! stores down, after which every operation fails with
//! [`StoreError::ShutdownInProgress`](bookshop_runtime::StoreError).

use crate::admin::{self, AdminDashboard};
use crate::auth::{
    AuthAction, AuthEnvironment, AuthMode, AuthReducer, AuthService, AuthState, CredentialStore,
    CredentialsForm, InMemoryCredentialStore, MockAuthService, User, UuidGenerator,
};
use crate::cart::{CartAction, CartEnvironment, CartReducer, CartState};
use crate::catalog::{Book, BookId, Catalog};
use crate::checkout::{
    CheckoutForm, MockOrderProcessor, OrderConfirmation, OrderProcessor, OrderRequest, OrderSummary,
    PaymentDetails, PricingPolicy, ShippingDetails,
};
use crate::config::StorefrontConfig;
use crate::error::{AuthError, Result, StorefrontError};
use crate::orders::{FixtureOrderHistory, OrderHistory, OrderRecord};
use bookshop_core::environment::{Clock, IdGenerator, SystemClock};
use bookshop_runtime::{Store, StoreError};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Store holding the session cart
pub type CartStore = Store<CartState, CartAction, CartEnvironment, CartReducer>;

/// Store holding the session's signed-in user
pub type AuthStore = Store<AuthState, AuthAction, AuthEnvironment, AuthReducer>;

/// One shopper's cart, sign-in state and collaborators
pub struct Session {
    catalog: Arc<Catalog>,
    cart: CartStore,
    auth: AuthStore,
    pricing: PricingPolicy,
    order_processor: Arc<dyn OrderProcessor>,
    order_history: Arc<dyn OrderHistory>,
    response_timeout: Duration,
    shutdown_timeout: Duration,
    next_request: AtomicU64,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("books", &self.catalog.len())
            .field("pricing", &self.pricing)
            .field("response_timeout", &self.response_timeout)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Start a session with the bundled catalog and mock backends
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Catalog`] if the bundled catalog is corrupt.
    pub fn start(config: StorefrontConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    /// Start building a session with custom collaborators
    #[must_use]
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// End the session, waiting for in-flight requests to settle
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] if effects are still running when
    /// the shutdown timeout expires.
    #[tracing::instrument(skip(self))]
    pub async fn end(self) -> Result<()> {
        let (cart, auth) = tokio::join!(
            self.cart.shutdown(self.shutdown_timeout),
            self.auth.shutdown(self.shutdown_timeout),
        );
        cart?;
        auth?;
        tracing::info!("Session ended");
        Ok(())
    }

    // ========== Catalog ==========

    /// The shared catalog
    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Shipping and tax rules in effect
    #[must_use]
    pub const fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    // ========== Cart ==========

    /// Add one copy of a catalog book
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::BookNotFound`] for an unknown id, or
    /// [`StorefrontError::Store`] after the session ended.
    pub async fn add_to_cart(&self, book_id: &str) -> Result<()> {
        let book = self
            .catalog
            .find_by_id(book_id)
            .ok_or_else(|| StorefrontError::BookNotFound(BookId::new(book_id)))?;
        self.add_book(book).await
    }

    /// Add one copy of a book record
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] after the session ended.
    pub async fn add_book(&self, book: Arc<Book>) -> Result<()> {
        self.cart.send(CartAction::AddItem { book }).await?;
        Ok(())
    }

    /// Remove a book's line; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] after the session ended.
    pub async fn remove_from_cart(&self, book_id: &str) -> Result<()> {
        self.cart
            .send(CartAction::RemoveItem {
                book_id: BookId::new(book_id),
            })
            .await?;
        Ok(())
    }

    /// Set a line's quantity; zero or less removes it
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] after the session ended.
    pub async fn update_quantity(&self, book_id: &str, quantity: i64) -> Result<()> {
        self.cart
            .send(CartAction::UpdateQuantity {
                book_id: BookId::new(book_id),
                quantity,
            })
            .await?;
        Ok(())
    }

    /// Empty the cart
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] after the session ended.
    pub async fn clear_cart(&self) -> Result<()> {
        self.cart.send(CartAction::ClearCart).await?;
        Ok(())
    }

    /// Snapshot of the cart
    pub async fn cart(&self) -> CartState {
        self.cart.state(CartState::clone).await
    }

    /// Copies in the cart, for the badge
    pub async fn item_count(&self) -> u64 {
        self.cart.state(CartState::item_count).await
    }

    /// Cart page totals (no tax)
    pub async fn cart_summary(&self) -> OrderSummary {
        let subtotal = self.cart.state(CartState::total).await;
        OrderSummary::cart_preview(subtotal, &self.pricing)
    }

    // ========== Auth ==========

    /// Sign in; `Ok(false)` when the credentials do not match
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unavailable`] if the service does not answer in
    /// time, or [`StorefrontError::Store`] after the session ended.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<bool> {
        let request = self.next_request();
        let action = AuthAction::Login {
            request,
            email: email.to_string(),
            password: password.to_string(),
        };
        self.await_auth_outcome(request, action).await
    }

    /// Create a customer account and sign in; `Ok(false)` when the email
    /// is taken
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unavailable`] if the service does not answer in
    /// time, or [`StorefrontError::Store`] after the session ended.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<bool> {
        let request = self.next_request();
        let action = AuthAction::Register {
            request,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.await_auth_outcome(request, action).await
    }

    /// Validate the sign-in form, then log in or register
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::InvalidForm`] before contacting the
    /// service if any field is invalid.
    pub async fn submit_credentials(&self, form: &CredentialsForm, mode: AuthMode) -> Result<bool> {
        form.validate(mode).map_err(StorefrontError::InvalidForm)?;
        match mode {
            AuthMode::Login => self.login(&form.email, &form.password).await,
            AuthMode::Register => self.register(&form.name, &form.email, &form.password).await,
        }
    }

    /// Sign out
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Store`] after the session ended.
    pub async fn logout(&self) -> Result<()> {
        self.auth.send(AuthAction::Logout).await?;
        Ok(())
    }

    /// The signed-in user
    pub async fn current_user(&self) -> Option<User> {
        self.auth.state(|s| s.current_user.clone()).await
    }

    /// Whether someone is signed in
    pub async fn is_authenticated(&self) -> bool {
        self.auth.state(AuthState::is_authenticated).await
    }

    /// Whether an admin is signed in
    pub async fn is_admin(&self) -> bool {
        self.auth.state(AuthState::is_admin).await
    }

    /// Why the last sign-in or registration failed
    pub async fn last_auth_error(&self) -> Option<AuthError> {
        self.auth.state(|s| s.last_error.clone()).await
    }

    fn next_request(&self) -> u64 {
        self.next_request.fetch_add(1, Ordering::Relaxed)
    }

    async fn await_auth_outcome(&self, request: u64, action: AuthAction) -> Result<bool> {
        let outcome = self
            .auth
            .send_and_wait_for(
                action,
                move |a| a.outcome_of() == Some(request),
                self.response_timeout,
            )
            .await;

        match outcome {
            Ok(outcome) => Ok(outcome.is_success()),
            Err(StoreError::Timeout) => {
                tracing::warn!(request, timeout = ?self.response_timeout, "Auth service did not answer");
                Err(AuthError::Unavailable(format!(
                    "no answer within {} ms",
                    self.response_timeout.as_millis()
                ))
                .into())
            },
            Err(error) => Err(error.into()),
        }
    }

    async fn require_user(&self) -> Result<User> {
        self.current_user()
            .await
            .ok_or(StorefrontError::NotAuthenticated)
    }

    // ========== Checkout ==========

    /// A checkout form prefilled from the signed-in user
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotAuthenticated`] when nobody is signed in.
    pub async fn checkout_form(&self) -> Result<CheckoutForm> {
        let user = self.require_user().await?;
        Ok(CheckoutForm {
            shipping: ShippingDetails::prefill(&user),
            payment: PaymentDetails::default(),
        })
    }

    /// Checkout page totals (with tax)
    pub async fn checkout_summary(&self) -> OrderSummary {
        let subtotal = self.cart.state(CartState::total).await;
        OrderSummary::for_checkout(subtotal, &self.pricing)
    }

    /// Place the order and empty the cart
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotAuthenticated`]: nobody is signed in
    /// - [`StorefrontError::EmptyCart`]: nothing to buy
    /// - [`StorefrontError::InvalidForm`]: a required field is blank
    /// - [`StorefrontError::Order`]: the processor refused the order
    #[tracing::instrument(skip_all)]
    pub async fn place_order(&self, form: &CheckoutForm) -> Result<OrderConfirmation> {
        let user = self.require_user().await?;
        let (lines, subtotal) = self.cart.state(|s| (s.items().to_vec(), s.total())).await;
        if lines.is_empty() {
            return Err(StorefrontError::EmptyCart);
        }
        form.validate().map_err(StorefrontError::InvalidForm)?;

        let request = OrderRequest {
            user,
            lines,
            summary: OrderSummary::for_checkout(subtotal, &self.pricing),
            shipping: form.shipping.clone(),
        };

        let confirmation = self.order_processor.place(request).await?;
        self.cart.send(CartAction::ClearCart).await?;
        Ok(confirmation)
    }

    // ========== Orders ==========

    /// The signed-in user's past orders
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotAuthenticated`] when nobody is signed in.
    pub async fn order_history(&self) -> Result<Vec<OrderRecord>> {
        let user = self.require_user().await?;
        Ok(self.order_history.orders_for(&user).await)
    }

    // ========== Admin ==========

    async fn require_admin(&self) -> Result<()> {
        if self.is_admin().await {
            Ok(())
        } else {
            Err(StorefrontError::Forbidden)
        }
    }

    /// Dashboard overview
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Forbidden`] unless an admin is signed in.
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard> {
        self.require_admin().await?;
        Ok(AdminDashboard::sample())
    }

    /// Inventory table rows matching `query`
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Forbidden`] unless an admin is signed in.
    pub async fn admin_inventory(&self, query: &str) -> Result<Vec<Arc<Book>>> {
        self.require_admin().await?;
        Ok(admin::inventory(&self.catalog, query))
    }
}

/// Builder for [`Session`]; unset collaborators get the mock defaults
#[derive(Default)]
pub struct SessionBuilder {
    config: StorefrontConfig,
    catalog: Option<Arc<Catalog>>,
    credentials: Option<Arc<dyn CredentialStore>>,
    auth_service: Option<Arc<dyn AuthService>>,
    ids: Option<Arc<dyn IdGenerator>>,
    clock: Option<Arc<dyn Clock>>,
    order_processor: Option<Arc<dyn OrderProcessor>>,
    order_history: Option<Arc<dyn OrderHistory>>,
}

impl SessionBuilder {
    /// Timeouts, latencies and pricing
    #[must_use]
    pub fn config(mut self, config: StorefrontConfig) -> Self {
        self.config = config;
        self
    }

    /// Use this catalog instead of the bundled one
    #[must_use]
    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Credential table behind the mock auth service
    #[must_use]
    pub fn credentials(mut self, credentials: Arc<dyn CredentialStore>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the mock auth service entirely
    #[must_use]
    pub fn auth_service(mut self, service: Arc<dyn AuthService>) -> Self {
        self.auth_service = Some(service);
        self
    }

    /// Source of new account ids
    #[must_use]
    pub fn id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = Some(ids);
        self
    }

    /// Clock used for order timestamps
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Replace the mock order processor
    #[must_use]
    pub fn order_processor(mut self, processor: Arc<dyn OrderProcessor>) -> Self {
        self.order_processor = Some(processor);
        self
    }

    /// Replace the fixture order history
    #[must_use]
    pub fn order_history(mut self, history: Arc<dyn OrderHistory>) -> Self {
        self.order_history = Some(history);
        self
    }

    /// Wire up the stores
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::Catalog`] if no catalog was given and the
    /// bundled one fails to load.
    pub fn build(self) -> Result<Session> {
        let config = self.config;
        let catalog = match self.catalog {
            Some(catalog) => catalog,
            None => Arc::new(Catalog::bundled()?),
        };

        let auth_service = self.auth_service.unwrap_or_else(|| {
            let credentials = self
                .credentials
                .unwrap_or_else(|| Arc::new(InMemoryCredentialStore::seeded()));
            Arc::new(MockAuthService::new(credentials).with_latency(config.auth_latency()))
        });
        let ids = self.ids.unwrap_or_else(|| Arc::new(UuidGenerator));
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let order_processor = self.order_processor.unwrap_or_else(|| {
            Arc::new(MockOrderProcessor::new(clock).with_delay(config.checkout_delay()))
        });
        let order_history = self
            .order_history
            .unwrap_or_else(|| Arc::new(FixtureOrderHistory));

        tracing::info!(books = catalog.len(), "Session started");

        Ok(Session {
            catalog,
            cart: Store::new(CartState::new(), CartReducer::new(), CartEnvironment),
            auth: Store::new(
                AuthState::new(),
                AuthReducer::new(),
                AuthEnvironment::new(auth_service, ids),
            ),
            pricing: config.pricing,
            order_processor,
            order_history,
            response_timeout: config.response_timeout(),
            shutdown_timeout: config.shutdown_timeout(),
            next_request: AtomicU64::new(1),
        })
    }
}
