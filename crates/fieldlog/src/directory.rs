// SPDX-FileCopyrightText: 2026 Fieldlog Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config-backed company directory.
//!
//! Registration CRUD lives outside this bot; at runtime a read-only
//! mapping from the `[directory]` config section is all the pipeline needs.

use std::collections::HashMap;

use async_trait::async_trait;
use fieldlog_config::model::DirectoryConfig;
use fieldlog_core::{CompanyDirectory, UserId};

/// Company lookup backed by static configuration.
pub struct StaticDirectory {
    users: HashMap<u64, String>,
    default_company: Option<String>,
}

impl StaticDirectory {
    pub fn from_config(config: &DirectoryConfig) -> Self {
        let users = config
            .users
            .iter()
            .filter_map(|(id, company)| id.parse::<u64>().ok().map(|id| (id, company.clone())))
            .collect();
        Self {
            users,
            default_company: config.default_company.clone(),
        }
    }
}

#[async_trait]
impl CompanyDirectory for StaticDirectory {
    async fn is_registered(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id.0) || self.default_company.is_some()
    }

    async fn company_of(&self, user_id: UserId) -> Option<String> {
        self.users
            .get(&user_id.0)
            .cloned()
            .or_else(|| self.default_company.clone())
    }
}
