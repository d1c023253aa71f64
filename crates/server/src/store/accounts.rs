//! Account repository.

use chrono::Utc;
use tracing::{debug, instrument};

use study_helper_core::AccountId;

use super::{MemoryStore, StoreData, StoreError};
use crate::models::{Account, AccountDraft, AccountPatch};
use crate::validation::ValidationErrors;

/// Repository for account operations.
pub struct AccountRepository<'a> {
    store: &'a MemoryStore,
}

impl<'a> AccountRepository<'a> {
    /// Create a new account repository.
    #[must_use]
    pub const fn new(store: &'a MemoryStore) -> Self {
        Self { store }
    }

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self), fields(account_id = %id))]
    pub fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.store.read()?.accounts.get(&id).cloned())
    }

    /// All accounts in creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self.store.read()?.accounts.values().cloned().collect())
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the draft is malformed or its
    /// `firebaseUid` or email already belongs to another account.
    #[instrument(skip(self, draft))]
    pub fn create(&self, draft: &AccountDraft) -> Result<Account, StoreError> {
        let mut errors = ValidationErrors::new();
        let new = draft.validate(&mut errors);

        let mut data = self.store.write()?;
        if let Some(new) = &new {
            check_unique(&data, None, &new.identity_uid, new.email.as_str(), &mut errors);
        }
        let new = errors.complete(new)?;

        let account = Account {
            id: AccountId::generate(),
            identity_uid: new.identity_uid,
            email: new.email,
            name: new.name,
            avatar: new.avatar,
            points: new.points,
            rank: new.rank,
            questions_answered: new.questions_answered,
            created_at: Utc::now(),
        };
        data.accounts.insert(account.id, account.clone());
        drop(data);

        debug!(account_id = %account.id, "account created");
        Ok(account)
    }

    /// Merge `patch` into an existing account.
    ///
    /// Returns `Ok(None)` if no account has this ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if a present field is invalid or
    /// would collide with another account. Nothing is changed on error.
    #[instrument(skip(self, patch), fields(account_id = %id))]
    pub fn update(
        &self,
        id: AccountId,
        patch: &AccountPatch,
    ) -> Result<Option<Account>, StoreError> {
        let mut data = self.store.write()?;
        let Some(current) = data.accounts.get(&id) else {
            return Ok(None);
        };

        let mut errors = ValidationErrors::new();
        let updated = patch.apply(current, &mut errors);
        check_unique(
            &data,
            Some(id),
            &updated.identity_uid,
            updated.email.as_str(),
            &mut errors,
        );
        let updated = errors.finish(updated)?;

        data.accounts.insert(id, updated.clone());
        drop(data);

        debug!("account updated");
        Ok(Some(updated))
    }

    /// Look up an account by the identity provider's user ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self))]
    pub fn find_by_external_id(&self, identity_uid: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .store
            .read()?
            .accounts
            .values()
            .find(|account| account.identity_uid == identity_uid)
            .cloned())
    }

    /// Accounts ordered by points, highest first. Ties keep creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    #[instrument(skip(self))]
    pub fn top_helpers(&self, limit: usize) -> Result<Vec<Account>, StoreError> {
        let mut accounts = self.list()?;
        accounts.sort_by(|a, b| b.points.cmp(&a.points));
        accounts.truncate(limit);
        Ok(accounts)
    }

    /// The earliest-created account, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn first(&self) -> Result<Option<Account>, StoreError> {
        Ok(self.store.read()?.accounts.values().next().cloned())
    }
}

fn check_unique(
    data: &StoreData,
    except: Option<AccountId>,
    identity_uid: &str,
    email: &str,
    errors: &mut ValidationErrors,
) {
    let others = data
        .accounts
        .values()
        .filter(|account| Some(account.id) != except);
    for account in others {
        if account.identity_uid == identity_uid && !errors.has("firebaseUid") {
            errors.add("firebaseUid", "is already registered");
        }
        if account.email.as_str() == email && !errors.has("email") {
            errors.add("email", "is already registered");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(uid: &str, email: &str, points: u32) -> AccountDraft {
        AccountDraft {
            identity_uid: Some(uid.to_owned()),
            email: Some(email.to_owned()),
            name: Some(format!("Student {uid}")),
            points: Some(points),
            ..AccountDraft::default()
        }
    }

    #[test]
    fn test_create_then_get() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        let account = repo.create(&draft("u1", "one@example.com", 0)).unwrap();

        assert_eq!(repo.get(account.id).unwrap(), Some(account.clone()));
        assert_eq!(repo.list().unwrap(), vec![account]);
        assert_eq!(repo.get(AccountId::generate()).unwrap(), None);
    }

    #[test]
    fn test_create_rejects_duplicate_identity_and_email() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        repo.create(&draft("u1", "one@example.com", 0)).unwrap();

        let err = repo.create(&draft("u1", "one@example.com", 0)).unwrap_err();
        let StoreError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.field_names(), vec!["firebaseUid", "email"]);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_external_id() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        let account = repo.create(&draft("u7", "seven@example.com", 0)).unwrap();

        assert_eq!(repo.find_by_external_id("u7").unwrap(), Some(account));
        assert_eq!(repo.find_by_external_id("missing").unwrap(), None);
    }

    #[test]
    fn test_top_helpers_orders_by_points_and_keeps_ties_stable() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        let a = repo.create(&draft("a", "a@example.com", 10)).unwrap();
        let b = repo.create(&draft("b", "b@example.com", 30)).unwrap();
        let c = repo.create(&draft("c", "c@example.com", 10)).unwrap();

        let ids: Vec<_> = repo.top_helpers(10).unwrap().into_iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![b.id, a.id, c.id]);
        assert_eq!(repo.top_helpers(1).unwrap().len(), 1);
        assert!(repo.top_helpers(0).unwrap().is_empty());
    }

    #[test]
    fn test_first_is_earliest_created() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        assert_eq!(repo.first().unwrap(), None);

        let a = repo.create(&draft("a", "a@example.com", 0)).unwrap();
        repo.create(&draft("b", "b@example.com", 99)).unwrap();
        assert_eq!(repo.first().unwrap().map(|x| x.id), Some(a.id));
    }

    #[test]
    fn test_update_keeps_id_and_created_at() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        let account = repo.create(&draft("a", "a@example.com", 0)).unwrap();

        let patch = AccountPatch {
            points: Some(120),
            rank: Some("Silver Helper".to_owned()),
            ..AccountPatch::default()
        };
        let updated = repo.update(account.id, &patch).unwrap().unwrap();
        assert_eq!(updated.id, account.id);
        assert_eq!(updated.created_at, account.created_at);
        assert_eq!(updated.points, 120);
        assert_eq!(repo.get(account.id).unwrap(), Some(updated));
    }

    #[test]
    fn test_update_unknown_id_is_none() {
        let store = MemoryStore::new();
        let patch = AccountPatch::default();
        assert_eq!(store.accounts().update(AccountId::generate(), &patch).unwrap(), None);
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        repo.create(&draft("a", "a@example.com", 0)).unwrap();
        let b = repo.create(&draft("b", "b@example.com", 0)).unwrap();

        let patch = AccountPatch {
            email: Some("a@example.com".to_owned()),
            points: Some(500),
            ..AccountPatch::default()
        };
        assert!(matches!(
            repo.update(b.id, &patch),
            Err(StoreError::Validation(_))
        ));
        assert_eq!(repo.get(b.id).unwrap(), Some(b));
    }

    #[test]
    fn test_update_may_keep_own_email() {
        let store = MemoryStore::new();
        let repo = store.accounts();
        let a = repo.create(&draft("a", "a@example.com", 0)).unwrap();
        let patch = AccountPatch {
            email: Some("a@example.com".to_owned()),
            ..AccountPatch::default()
        };
        assert!(repo.update(a.id, &patch).unwrap().is_some());
    }
}
