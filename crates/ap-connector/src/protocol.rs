//! Controller wire format
//!
//! Responses are decoded into one normalized schema; the controller is not
//! consistent about key casing, so every field lists its known spellings as
//! serde aliases. Requests use the PascalCase keys the controller expects,
//! with channel numbers and numeric values sent as strings.

use std::fmt;

use serde::{Deserialize, Serialize};

use ap_core::DEVICE_MAX_TAPS;

use crate::{ConnectorError, ConnectorResult};

// ============ Endpoints ============

/// Controller endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    GetSystemStatus,
    SetAdvancedEqGain,
    SetAdvancedEqDelay,
    SetSpeakerEqFir,
    SetOutputEqFir,
    SetOutputEqGain,
    SetOutputEqPhase,
    CreateAndAssignGroup,
    UnassignGroup,
    OpenEntityDetails,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::GetSystemStatus => "GetSystemStatus",
            Self::SetAdvancedEqGain => "SetAdvancedEqGain",
            Self::SetAdvancedEqDelay => "SetAdvancedEqDelay",
            Self::SetSpeakerEqFir => "SetSpeakerEqFIR",
            Self::SetOutputEqFir => "SetOutputEqFIR",
            Self::SetOutputEqGain => "SetOutputEqGain",
            Self::SetOutputEqPhase => "SetOutputEqPhase",
            Self::CreateAndAssignGroup => "CreateAndAssignGroup",
            Self::UnassignGroup => "UnassignGroup",
            Self::OpenEntityDetails => "OpenEntityDetails",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// FIR slot on a device channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FirTarget {
    /// Output EQ FIR
    #[default]
    Output,
    /// Speaker EQ FIR
    Speaker,
}

impl FirTarget {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::Output => Endpoint::SetOutputEqFir,
            Self::Speaker => Endpoint::SetSpeakerEqFir,
        }
    }
}

// ============ Responses ============

fn unnamed() -> String {
    "Unnamed".to_string()
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn not_assigned() -> String {
    "Not assigned".to_string()
}

/// One device as reported by `GetSystemStatus`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(
        rename = "uniqueID",
        alias = "UniqueID",
        alias = "uniqueId",
        alias = "UniqueId",
        default = "unknown"
    )]
    pub unique_id: String,

    #[serde(alias = "Name", default = "unnamed")]
    pub name: String,

    #[serde(alias = "Model", default = "unknown")]
    pub model: String,

    #[serde(alias = "IsOnline", default)]
    pub is_online: bool,

    #[serde(alias = "IsLinked", default)]
    pub is_linked: bool,

    #[serde(
        alias = "IpAddress",
        alias = "IPAddress",
        alias = "ipAddr",
        default = "not_assigned"
    )]
    pub ip_address: String,

    #[serde(alias = "FirmwareVersion", alias = "firmware", default = "unknown")]
    pub firmware_version: String,

    #[serde(alias = "SerialNumber", alias = "serial", default = "unknown")]
    pub serial_number: String,
}

impl Device {
    pub fn status_label(&self) -> &'static str {
        if self.is_online { "Online" } else { "Offline" }
    }

    /// Multi-line detail block
    pub fn details(&self) -> String {
        format!(
            "Name: {}\nModel: {}\nID: {}\nIP: {}\nStatus: {}\nLinked: {}\nFirmware: {}\nSerial: {}",
            self.name,
            self.model,
            self.unique_id,
            self.ip_address,
            self.status_label(),
            if self.is_linked { "Yes" } else { "No" },
            self.firmware_version,
            self.serial_number
        )
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {}\n   ID: {}\n   IP: {}\n   Firmware: {}",
            self.name,
            self.model,
            self.status_label(),
            self.unique_id,
            self.ip_address,
            self.firmware_version
        )
    }
}

/// `GetSystemStatus` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    #[serde(alias = "Devices", default)]
    pub devices: Vec<Device>,
}

impl SystemStatus {
    pub fn online(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter().filter(|d| d.is_online)
    }

    pub fn find(&self, unique_id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.unique_id == unique_id)
    }
}

/// `CreateAndAssignGroup` response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupResponse {
    #[serde(rename = "Guid", alias = "guid", alias = "GUID", default)]
    pub guid: Option<String>,
}

// ============ Requests ============

/// Scalar value for one channel (gain, delay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelValue {
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl ChannelValue {
    pub fn new(unique_id: &str, channel: u32, value: f64) -> Self {
        Self {
            unique_id: unique_id.to_string(),
            channel: channel.to_string(),
            value: value.to_string(),
        }
    }
}

/// Boolean flag for one channel (phase invert)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFlag {
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Value")]
    pub value: bool,
}

impl ChannelFlag {
    pub fn new(unique_id: &str, channel: u32, value: bool) -> Self {
        Self {
            unique_id: unique_id.to_string(),
            channel: channel.to_string(),
            value,
        }
    }
}

/// FIR coefficients for one channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelFir {
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
    #[serde(rename = "Channel")]
    pub channel: String,
    #[serde(rename = "Values")]
    pub values: Vec<String>,
}

impl ChannelFir {
    /// Build the request, refusing more taps than the controller accepts
    pub fn new(unique_id: &str, channel: u32, coeffs: &[f64]) -> ConnectorResult<Self> {
        if coeffs.len() > DEVICE_MAX_TAPS {
            return Err(ConnectorError::TooManyTaps {
                taps: coeffs.len(),
                limit: DEVICE_MAX_TAPS,
            });
        }
        Ok(Self {
            unique_id: unique_id.to_string(),
            channel: channel.to_string(),
            values: coeffs.iter().map(f64::to_string).collect(),
        })
    }
}

/// Device channel taking part in a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLink {
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
    #[serde(rename = "Channel")]
    pub channel: String,
}

impl GroupLink {
    pub fn new(unique_id: &str, channel: u32) -> Self {
        Self {
            unique_id: unique_id.to_string(),
            channel: channel.to_string(),
        }
    }

    /// Parse `DEVICE_ID:CHANNEL`
    pub fn parse(s: &str) -> ConnectorResult<Self> {
        let invalid = || ConnectorError::InvalidLink(s.to_string());
        let (id, channel) = s.rsplit_once(':').ok_or_else(invalid)?;
        let channel: u32 = channel.trim().parse().map_err(|_| invalid())?;
        let id = id.trim();
        if id.is_empty() {
            return Err(invalid());
        }
        Ok(Self::new(id, channel))
    }
}

/// Body of `CreateAndAssignGroup` / `UnassignGroup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLinks {
    #[serde(rename = "GroupLinks")]
    pub links: Vec<GroupLink>,
}

/// Body of `OpenEntityDetails`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    #[serde(rename = "UniqueID")]
    pub unique_id: String,
}

// ============ Tests ============
