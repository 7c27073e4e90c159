// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Repository Implementations
//!
//! Infrastructure implementations of the repository traits defined in
//! `crate::domain::repository`.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Persist and retrieve domain aggregates
//! - **Pattern:** Repository (DDD), Adapter (Hexagonal Architecture)
//!
//! # Available Implementations
//!
//! ## PostgreSQL Repositories
//!
//! - **PostgresDomainRepository** - tenant domains and access keys
//! - **PostgresPatternRepository** - response patterns
//! - **PostgresDnsRecordRepository** - DNS records
//! - **PostgresInteractionRepository** - captured traffic (read-only)
//!
//! ## In-Memory Repositories
//!
//! Lock-guarded maps for development and tests. The interaction store also
//! exposes `record_*` methods standing in for the capture pipeline.

pub mod postgres_dns_record;
pub mod postgres_domain;
pub mod postgres_interaction;
pub mod postgres_pattern;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dns_record::DnsRecord;
use crate::domain::interaction::{
    After, Captured, DnsInteraction, HttpInteraction, HttpQuery, InteractionCounts,
    SmtpInteraction,
};
use crate::domain::pattern::Pattern;
use crate::domain::payload::ResourceId;
use crate::domain::repository::{
    DnsRecordRepository, DomainRepository, InteractionRepository, PatternRepository,
    RepositoryError,
};
use crate::domain::tenant::{AccessKey, Domain, Host};

#[derive(Clone, Default)]
pub struct InMemoryDomainRepository {
    domains: Arc<RwLock<HashMap<Host, Domain>>>,
}

impl InMemoryDomainRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DomainRepository for InMemoryDomainRepository {
    async fn insert(&self, domain: &Domain) -> Result<(), RepositoryError> {
        let mut domains = self.domains.write().await;
        if domains.contains_key(&domain.host) {
            return Err(RepositoryError::Conflict(format!(
                "domain {} already exists",
                domain.host
            )));
        }
        domains.insert(domain.host.clone(), domain.clone());
        Ok(())
    }

    async fn find_by_host(&self, host: &Host) -> Result<Option<Domain>, RepositoryError> {
        let domains = self.domains.read().await;
        Ok(domains.get(host).cloned())
    }

    async fn find_by_access_key(&self, key: &AccessKey) -> Result<Option<Domain>, RepositoryError> {
        let domains = self.domains.read().await;
        Ok(domains.values().find(|d| &d.access_key == key).cloned())
    }
}

#[derive(Clone, Default)]
pub struct InMemoryPatternRepository {
    patterns: Arc<RwLock<Vec<Pattern>>>,
}

impl InMemoryPatternRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatternRepository for InMemoryPatternRepository {
    async fn insert(&self, pattern: &Pattern) -> Result<(), RepositoryError> {
        self.patterns.write().await.push(pattern.clone());
        Ok(())
    }

    async fn list_by_host(&self, host: &Host) -> Result<Vec<Pattern>, RepositoryError> {
        let patterns = self.patterns.read().await;
        Ok(patterns.iter().filter(|p| &p.host == host).cloned().collect())
    }

    async fn find(&self, host: &Host, id: &ResourceId) -> Result<Option<Pattern>, RepositoryError> {
        let patterns = self.patterns.read().await;
        Ok(patterns
            .iter()
            .find(|p| &p.host == host && &p.id == id)
            .cloned())
    }

    async fn replace(&self, pattern: &Pattern) -> Result<bool, RepositoryError> {
        let mut patterns = self.patterns.write().await;
        match patterns
            .iter_mut()
            .find(|p| p.host == pattern.host && p.id == pattern.id)
        {
            Some(existing) => {
                *existing = pattern.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, host: &Host, id: &ResourceId) -> Result<bool, RepositoryError> {
        let mut patterns = self.patterns.write().await;
        match patterns.iter().position(|p| &p.host == host && &p.id == id) {
            Some(index) => {
                patterns.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Clone, Default)]
pub struct InMemoryDnsRecordRepository {
    records: Arc<RwLock<Vec<DnsRecord>>>,
}

impl InMemoryDnsRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DnsRecordRepository for InMemoryDnsRecordRepository {
    async fn insert(&self, record: &DnsRecord) -> Result<(), RepositoryError> {
        self.records.write().await.push(record.clone());
        Ok(())
    }

    async fn list_by_host(&self, host: &Host) -> Result<Vec<DnsRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| &r.host == host).cloned().collect())
    }

    async fn find(&self, host: &Host, id: &ResourceId) -> Result<Option<DnsRecord>, RepositoryError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .find(|r| &r.host == host && &r.id == id)
            .cloned())
    }

    async fn replace(&self, record: &DnsRecord) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        match records
            .iter_mut()
            .find(|r| r.host == record.host && r.id == record.id)
        {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, host: &Host, id: &ResourceId) -> Result<bool, RepositoryError> {
        let mut records = self.records.write().await;
        match records.iter().position(|r| &r.host == host && &r.id == id) {
            Some(index) => {
                records.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
struct InteractionStreams {
    http: Vec<HttpInteraction>,
    dns: Vec<DnsInteraction>,
    smtp: Vec<SmtpInteraction>,
}

#[derive(Clone, Default)]
pub struct InMemoryInteractionRepository {
    streams: Arc<RwLock<InteractionStreams>>,
}

impl InMemoryInteractionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record_http(&self, interaction: HttpInteraction) {
        self.streams.write().await.http.push(interaction);
    }

    pub async fn record_dns(&self, interaction: DnsInteraction) {
        self.streams.write().await.dns.push(interaction);
    }

    pub async fn record_smtp(&self, interaction: SmtpInteraction) {
        self.streams.write().await.smtp.push(interaction);
    }
}

fn window<'a, T, F>(stream: &'a [T], after: After, host_of: F) -> impl Iterator<Item = &'a T> + 'a
where
    T: Captured,
    F: Fn(&T) -> bool + 'a,
{
    stream
        .iter()
        .filter(move |i| host_of(i) && after.admits(i.captured_at()))
}

#[async_trait]
impl InteractionRepository for InMemoryInteractionRepository {
    async fn find_http(&self, host: &Host, query: &HttpQuery) -> Result<Vec<HttpInteraction>, RepositoryError> {
        let streams = self.streams.read().await;
        Ok(window(&streams.http, query.after, |i| &i.host == host)
            .filter(|i| match &query.pattern_id {
                Some(pattern_id) => i.pattern_id.as_ref() == Some(pattern_id),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn find_dns(&self, host: &Host, after: After) -> Result<Vec<DnsInteraction>, RepositoryError> {
        let streams = self.streams.read().await;
        Ok(window(&streams.dns, after, |i| &i.host == host).cloned().collect())
    }

    async fn find_smtp(&self, host: &Host, after: After) -> Result<Vec<SmtpInteraction>, RepositoryError> {
        let streams = self.streams.read().await;
        Ok(window(&streams.smtp, after, |i| &i.host == host).cloned().collect())
    }

    async fn count(&self, host: &Host) -> Result<InteractionCounts, RepositoryError> {
        let streams = self.streams.read().await;
        Ok(InteractionCounts {
            http: streams.http.iter().filter(|i| &i.host == host).count() as u64,
            dns: streams.dns.iter().filter(|i| &i.host == host).count() as u64,
            smtp: streams.smtp.iter().filter(|i| &i.host == host).count() as u64,
        })
    }
}
