//! Read-through list stores for presentation code.
//!
//! A store owns the last fetched list for one view. Every mutation awaits the
//! client call, invalidates the list and awaits a refetch before returning,
//! so callers never read a list that predates their own write.

use std::future::Future;
use std::sync::Arc;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use user_addresses_sdk::{
    AddressCreateRequest, AddressKey, AddressUpdateRequest, AddressView, FieldViolation, Pager,
    UserAddressesClientV1, UserAddressesError, UserForm, UserFormPatch, UserView,
    sort_by_priority,
};

struct CacheState<T> {
    items: Vec<T>,
    stale: bool,
}

/// Last fetched list plus a stale flag.
pub struct ListCache<T> {
    state: RwLock<CacheState<T>>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(CacheState {
                items: Vec::new(),
                stale: true,
            }),
        }
    }
}

impl<T: Clone> ListCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached list, fetching it first when stale.
    ///
    /// Concurrent callers on a stale cache wait for a single fetch. A failed
    /// fetch leaves the cache stale.
    ///
    /// # Errors
    /// Whatever `fetch` returns.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Vec<T>, UserAddressesError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, UserAddressesError>>,
    {
        {
            let state = self.state.read().await;
            if !state.stale {
                return Ok(state.items.clone());
            }
        }

        let mut state = self.state.write().await;
        if !state.stale {
            return Ok(state.items.clone());
        }
        let items = fetch().await?;
        state.items.clone_from(&items);
        state.stale = false;
        Ok(items)
    }

    pub async fn invalidate(&self) {
        self.state.write().await.stale = true;
    }

    pub async fn is_stale(&self) -> bool {
        self.state.read().await.stale
    }

    /// The cached items without fetching, possibly stale.
    pub async fn snapshot(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }
}

#[derive(Default)]
struct ErrorSlot(RwLock<Option<String>>);

impl ErrorSlot {
    async fn clear(&self) {
        *self.0.write().await = None;
    }

    async fn track<T>(
        &self,
        result: Result<T, UserAddressesError>,
    ) -> Result<T, UserAddressesError> {
        if let Err(e) = &result {
            *self.0.write().await = Some(e.to_string());
        }
        result
    }

    async fn get(&self) -> Option<String> {
        self.0.read().await.clone()
    }
}

/// User list with address counts.
pub struct UsersStore {
    client: Arc<dyn UserAddressesClientV1>,
    users: ListCache<UserView>,
    error: ErrorSlot,
}

impl UsersStore {
    #[must_use]
    pub fn new(client: Arc<dyn UserAddressesClientV1>) -> Self {
        Self {
            client,
            users: ListCache::new(),
            error: ErrorSlot::default(),
        }
    }

    /// # Errors
    /// The client error when a fetch was needed and failed.
    pub async fn users(&self) -> Result<Vec<UserView>, UserAddressesError> {
        let result = self.users.get_or_fetch(|| self.client.list_users()).await;
        self.error.track(result).await
    }

    /// # Errors
    /// The client error when the fetch fails.
    pub async fn refetch(&self) -> Result<Vec<UserView>, UserAddressesError> {
        self.users.invalidate().await;
        self.users().await
    }

    /// Message of the most recent failure, cleared when a mutation starts.
    pub async fn last_error(&self) -> Option<String> {
        self.error.get().await
    }

    pub async fn is_stale(&self) -> bool {
        self.users.is_stale().await
    }

    /// Users on the pager's current page. The pager falls back to page 1
    /// when the list shrank below it.
    ///
    /// # Errors
    /// The client error when a fetch was needed and failed.
    pub async fn page(&self, pager: &mut Pager) -> Result<Vec<UserView>, UserAddressesError> {
        let users = self.users().await?;
        pager.clamp(users.len());
        Ok(pager.page_items(&users).to_vec())
    }

    async fn after_mutation(&self) {
        if let Err(e) = self.refetch().await {
            warn!(error = %e, "Refetch after mutation failed");
        }
    }

    /// # Errors
    /// The client error; the list is left untouched.
    pub async fn create_user(&self, form: UserForm) -> Result<UserView, UserAddressesError> {
        self.error.clear().await;
        let created = self.error.track(self.client.create_user(form).await).await?;
        self.after_mutation().await;
        Ok(created)
    }

    /// # Errors
    /// The client error; the list is left untouched.
    pub async fn update_user(
        &self,
        id: i32,
        patch: UserFormPatch,
    ) -> Result<UserView, UserAddressesError> {
        self.error.clear().await;
        let updated = self
            .error
            .track(self.client.update_user(id, patch).await)
            .await?;
        self.after_mutation().await;
        Ok(updated)
    }

    /// # Errors
    /// The client error; the list is left untouched.
    pub async fn delete_user(&self, id: i32) -> Result<(), UserAddressesError> {
        self.error.clear().await;
        self.error.track(self.client.delete_user(id).await).await?;
        self.after_mutation().await;
        Ok(())
    }
}

/// Address form as edited in the UI: a typed `valid_from` instead of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressForm {
    pub address_type: String,
    pub valid_from: OffsetDateTime,
    pub post_code: String,
    pub city: String,
    pub country_code: String,
    pub street: String,
    pub building_number: String,
}

fn rfc3339(field: &str, at: OffsetDateTime) -> Result<String, UserAddressesError> {
    at.format(&Rfc3339).map_err(|e| {
        UserAddressesError::validation(vec![FieldViolation::new(field, e.to_string())])
    })
}

/// Addresses of one user.
pub struct AddressesStore {
    client: Arc<dyn UserAddressesClientV1>,
    user_id: i32,
    addresses: ListCache<AddressView>,
    error: ErrorSlot,
}

impl AddressesStore {
    #[must_use]
    pub fn new(client: Arc<dyn UserAddressesClientV1>, user_id: i32) -> Self {
        Self {
            client,
            user_id,
            addresses: ListCache::new(),
            error: ErrorSlot::default(),
        }
    }

    #[must_use]
    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    /// # Errors
    /// The client error when a fetch was needed and failed.
    pub async fn addresses(&self) -> Result<Vec<AddressView>, UserAddressesError> {
        let result = self
            .addresses
            .get_or_fetch(|| self.client.list_addresses(self.user_id))
            .await;
        self.error.track(result).await
    }

    /// # Errors
    /// The client error when the fetch fails.
    pub async fn refetch(&self) -> Result<Vec<AddressView>, UserAddressesError> {
        self.addresses.invalidate().await;
        self.addresses().await
    }

    pub async fn last_error(&self) -> Option<String> {
        self.error.get().await
    }

    pub async fn is_stale(&self) -> bool {
        self.addresses.is_stale().await
    }

    /// Addresses in display order: home, work, invoice, post, newest first.
    ///
    /// # Errors
    /// The client error when a fetch was needed and failed.
    pub async fn by_priority(&self) -> Result<Vec<AddressView>, UserAddressesError> {
        let mut views = self.addresses().await?;
        sort_by_priority(&mut views);
        Ok(views)
    }

    async fn after_mutation(&self) {
        if let Err(e) = self.refetch().await {
            warn!(user.id = self.user_id, error = %e, "Refetch after mutation failed");
        }
    }

    /// # Errors
    /// The client error; the list is left untouched.
    pub async fn create_address(
        &self,
        form: AddressForm,
    ) -> Result<AddressView, UserAddressesError> {
        self.error.clear().await;
        let result = match rfc3339("valid_from", form.valid_from) {
            Ok(valid_from) => {
                let req = AddressCreateRequest {
                    user_id: self.user_id,
                    address_type: form.address_type,
                    valid_from,
                    post_code: form.post_code,
                    city: form.city,
                    country_code: form.country_code,
                    street: form.street,
                    building_number: form.building_number,
                };
                self.client.create_address(req).await
            }
            Err(e) => Err(e),
        };
        let created = self.error.track(result).await?;
        self.after_mutation().await;
        Ok(created)
    }

    /// Update the address stored at `original` with the form values.
    ///
    /// # Errors
    /// The client error; the list is left untouched.
    pub async fn update_address(
        &self,
        original: AddressKey,
        form: AddressForm,
    ) -> Result<AddressView, UserAddressesError> {
        self.error.clear().await;
        debug!(address.id = %original.display_id(), "Submitting address update");
        let result = match (
            rfc3339("valid_from", form.valid_from),
            rfc3339("original_valid_from", original.valid_from),
        ) {
            (Ok(valid_from), Ok(original_valid_from)) => {
                let req = AddressUpdateRequest {
                    user_id: original.user_id,
                    address_type: form.address_type,
                    valid_from,
                    post_code: form.post_code,
                    city: form.city,
                    country_code: form.country_code,
                    street: form.street,
                    building_number: form.building_number,
                    original_address_type: original.address_type.as_str().to_owned(),
                    original_valid_from,
                };
                self.client.update_address(req).await
            }
            (Err(e), _) | (_, Err(e)) => Err(e),
        };
        let updated = self.error.track(result).await?;
        self.after_mutation().await;
        Ok(updated)
    }

    /// # Errors
    /// The client error; the list is left untouched.
    pub async fn delete_address(&self, key: AddressKey) -> Result<(), UserAddressesError> {
        self.error.clear().await;
        self.error
            .track(self.client.delete_address(key).await)
            .await?;
        self.after_mutation().await;
        Ok(())
    }
}
