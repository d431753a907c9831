// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Caravel-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Caravel and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connection settings read from the environment.
//!
//! Demo mode bypasses all of this; outside it, the store and AI endpoints
//! are required and fail fast at startup with the variable name in the
//! error.

use std::env;
use std::error::Error;
use std::ffi::OsString;
use std::fmt;

use crate::query::DEFAULT_PAGE_SIZE;

const STORE_URL: &str = "CARAVEL_STORE_URL";
const STORE_KEY: &str = "CARAVEL_STORE_KEY";
const AI_URL: &str = "CARAVEL_AI_URL";
const AI_KEY: &str = "CARAVEL_AI_KEY";
const AI_MODEL: &str = "CARAVEL_AI_MODEL";
const PAGE_SIZE: &str = "CARAVEL_PAGE_SIZE";

const DEFAULT_AI_MODEL: &str = "gpt-4o-mini";
const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    store_url: String,
    store_key: String,
    ai_url: String,
    ai_key: String,
    ai_model: String,
    page_size: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var_os(name))
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<OsString>,
    {
        Ok(Self {
            store_url: required(&lookup, STORE_URL)?,
            store_key: required(&lookup, STORE_KEY)?,
            ai_url: required(&lookup, AI_URL)?,
            ai_key: required(&lookup, AI_KEY)?,
            ai_model: optional(&lookup, AI_MODEL)?
                .unwrap_or_else(|| DEFAULT_AI_MODEL.to_owned()),
            page_size: match optional(&lookup, PAGE_SIZE)? {
                Some(value) => parse_page_size(&value)?,
                None => DEFAULT_PAGE_SIZE,
            },
        })
    }

    pub fn store_url(&self) -> &str {
        &self.store_url
    }

    pub fn store_key(&self) -> &str {
        &self.store_key
    }

    pub fn ai_url(&self) -> &str {
        &self.ai_url
    }

    pub fn ai_key(&self) -> &str {
        &self.ai_key
    }

    pub fn ai_model(&self) -> &str {
        &self.ai_model
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

fn optional<F>(lookup: &F, name: &'static str) -> Result<Option<String>, ConfigError>
where
    F: Fn(&'static str) -> Option<OsString>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    let value = raw.into_string().map_err(|_| ConfigError::InvalidEnv {
        name,
        value: "<non-unicode>".to_owned(),
    })?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(trimmed.to_owned()))
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&'static str) -> Option<OsString>,
{
    optional(lookup, name)?.ok_or(ConfigError::MissingEnv { name })
}

fn parse_page_size(value: &str) -> Result<usize, ConfigError> {
    let parsed: usize = value.parse().map_err(|_| ConfigError::InvalidEnv {
        name: PAGE_SIZE,
        value: value.to_owned(),
    })?;
    Ok(parsed.clamp(1, MAX_PAGE_SIZE))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingEnv { name: &'static str },
    InvalidEnv { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEnv { name } => {
                write!(f, "missing env {name} (or pass --demo to run offline)")
            }
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ConfigError {}
