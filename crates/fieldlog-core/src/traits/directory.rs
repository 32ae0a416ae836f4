// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Company registration lookup trait.

use async_trait::async_trait;

use crate::types::UserId;

/// Read-only view of user-to-company registration.
#[async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn is_registered(&self, user_id: UserId) -> bool;

    /// The company partition a user's entries belong to.
    async fn company_of(&self, user_id: UserId) -> Option<String>;
}
