use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budgets, pots, transactions};

use super::Engine;

pub(super) const PERMISSION_DENIED: &str = "missing or insufficient permissions";

/// Generates a `require_*` lookup that loads a record by id and checks it
/// belongs to the calling user.
///
/// Unknown ids map to `KeyNotFound`, records owned by someone else to
/// `Forbidden`.
macro_rules! impl_owned_record {
    ($require_fn:ident, $module:ident, $err_msg:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            record_id: Uuid,
            user_id: Uuid,
        ) -> ResultEngine<$module::Model> {
            let model = $module::Entity::find_by_id(record_id)
                .one(db)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound($err_msg.to_string()))?;
            if model.user_id != user_id {
                tracing::warn!(%record_id, %user_id, "access to foreign {} denied", stringify!($module));
                return Err(EngineError::Forbidden(PERMISSION_DENIED.to_string()));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_owned_record!(require_transaction, transactions, "transaction not exists");

    impl_owned_record!(require_budget, budgets, "budget not exists");

    impl_owned_record!(require_pot, pots, "pot not exists");
}
