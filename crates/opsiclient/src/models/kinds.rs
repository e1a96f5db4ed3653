//! Closed OPSI enumerations and their wire names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::OpsiError;

/// Action requested for a product on a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductAction {
    Setup,
    Uninstall,
    Update,
    Always,
    Once,
    Custom,
    None,
}

impl ProductAction {
    pub const ALL: [ProductAction; 7] = [
        ProductAction::Setup,
        ProductAction::Uninstall,
        ProductAction::Update,
        ProductAction::Always,
        ProductAction::Once,
        ProductAction::Custom,
        ProductAction::None,
    ];

    /// Name used by the OPSI server.
    pub fn as_opsi_name(&self) -> &'static str {
        match self {
            ProductAction::Setup => "setup",
            ProductAction::Uninstall => "uninstall",
            ProductAction::Update => "update",
            ProductAction::Always => "always",
            ProductAction::Once => "once",
            ProductAction::Custom => "custom",
            ProductAction::None => "none",
        }
    }
}

impl FromStr for ProductAction {
    type Err = OpsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_opsi_name() == s)
            .ok_or_else(|| OpsiError::InvalidArgument(format!("unknown product action '{}'", s)))
    }
}

impl fmt::Display for ProductAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_opsi_name())
    }
}

/// Kind of OPSI product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductType {
    NetBoot,
    LocalBoot,
}

impl ProductType {
    pub const ALL: [ProductType; 2] = [ProductType::NetBoot, ProductType::LocalBoot];

    /// Name used by the OPSI server.
    pub fn as_opsi_name(&self) -> &'static str {
        match self {
            ProductType::NetBoot => "NetbootProduct",
            ProductType::LocalBoot => "LocalbootProduct",
        }
    }
}

impl FromStr for ProductType {
    type Err = OpsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_opsi_name() == s)
            .ok_or_else(|| OpsiError::InvalidArgument(format!("unknown product type '{}'", s)))
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_opsi_name())
    }
}

macro_rules! wire_name_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.serialize_str(self.as_opsi_name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_name_serde!(ProductAction);
wire_name_serde!(ProductType);
