//! Controller HTTP client

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ConnectionConfig;
use crate::protocol::{
    ChannelFir, ChannelFlag, ChannelValue, Device, Endpoint, EntityRef, FirTarget, GroupLink,
    GroupLinks, GroupResponse, SystemStatus,
};
use crate::{ConnectorError, ConnectorResult};

/// Header carrying the client token
pub const AUTH_HEADER: &str = "authClientToken";

/// Client for the device controller API
///
/// Requests are issued once; failures are returned to the caller as-is.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    config: ConnectionConfig,
    http: reqwest::Client,
}

impl DeviceClient {
    pub fn new(config: ConnectionConfig) -> ConnectorResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth_token {
            Some(token) => req.header(AUTH_HEADER, token),
            None => req,
        }
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        req: reqwest::RequestBuilder,
    ) -> ConnectorResult<String> {
        let response = self.with_auth(req).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            log::error!("{} returned {}: {}", endpoint, status, body);
            return Err(ConnectorError::Status {
                endpoint: endpoint.path().to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> ConnectorResult<T> {
        let url = self.config.endpoint_url(endpoint.path());
        log::debug!("GET {}", url);
        let body = self.send(endpoint, self.http.get(&url)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<B: Serialize>(&self, endpoint: Endpoint, body: &B) -> ConnectorResult<String> {
        let url = self.config.endpoint_url(endpoint.path());
        log::debug!("POST {}", url);
        self.send(endpoint, self.http.post(&url).json(body)).await
    }

    // ============ Status ============

    /// All devices known to the controller
    pub async fn system_status(&self) -> ConnectorResult<SystemStatus> {
        let status: SystemStatus = self.get_json(Endpoint::GetSystemStatus).await?;
        log::info!("Controller reports {} devices", status.devices.len());
        Ok(status)
    }

    /// Devices currently online
    pub async fn online_devices(&self) -> ConnectorResult<Vec<Device>> {
        let status = self.system_status().await?;
        Ok(status.online().cloned().collect())
    }

    /// One device by unique ID
    pub async fn device_details(&self, unique_id: &str) -> ConnectorResult<Device> {
        let status = self.system_status().await?;
        status
            .find(unique_id)
            .cloned()
            .ok_or_else(|| ConnectorError::DeviceNotFound(unique_id.to_string()))
    }

    // ============ EQ ============

    pub async fn set_advanced_eq_gain(
        &self,
        unique_id: &str,
        channel: u32,
        value: f64,
    ) -> ConnectorResult<()> {
        log::info!("Setting Advanced EQ gain for {unique_id}, channel {channel} to {value}");
        let body = ChannelValue::new(unique_id, channel, value);
        self.post(Endpoint::SetAdvancedEqGain, &body).await?;
        Ok(())
    }

    pub async fn set_advanced_eq_delay(
        &self,
        unique_id: &str,
        channel: u32,
        value: f64,
    ) -> ConnectorResult<()> {
        log::info!("Setting Advanced EQ delay for {unique_id}, channel {channel} to {value}");
        let body = ChannelValue::new(unique_id, channel, value);
        self.post(Endpoint::SetAdvancedEqDelay, &body).await?;
        Ok(())
    }

    pub async fn set_output_eq_gain(
        &self,
        unique_id: &str,
        channel: u32,
        value: f64,
    ) -> ConnectorResult<()> {
        log::info!("Setting Output EQ gain for {unique_id}, channel {channel} to {value}");
        let body = ChannelValue::new(unique_id, channel, value);
        self.post(Endpoint::SetOutputEqGain, &body).await?;
        Ok(())
    }

    pub async fn set_output_eq_phase(
        &self,
        unique_id: &str,
        channel: u32,
        invert: bool,
    ) -> ConnectorResult<()> {
        log::info!("Setting Output EQ phase for {unique_id}, channel {channel} to {invert}");
        let body = ChannelFlag::new(unique_id, channel, invert);
        self.post(Endpoint::SetOutputEqPhase, &body).await?;
        Ok(())
    }

    // ============ FIR ============

    /// Push FIR coefficients to one channel
    pub async fn set_fir(
        &self,
        target: FirTarget,
        unique_id: &str,
        channel: u32,
        coeffs: &[f64],
    ) -> ConnectorResult<()> {
        let body = ChannelFir::new(unique_id, channel, coeffs)?;
        log::info!(
            "Sending {} taps to {} for {unique_id}, channel {channel}",
            coeffs.len(),
            target.endpoint()
        );
        self.post(target.endpoint(), &body).await?;
        Ok(())
    }

    pub async fn set_output_eq_fir(
        &self,
        unique_id: &str,
        channel: u32,
        coeffs: &[f64],
    ) -> ConnectorResult<()> {
        self.set_fir(FirTarget::Output, unique_id, channel, coeffs).await
    }

    pub async fn set_speaker_eq_fir(
        &self,
        unique_id: &str,
        channel: u32,
        coeffs: &[f64],
    ) -> ConnectorResult<()> {
        self.set_fir(FirTarget::Speaker, unique_id, channel, coeffs).await
    }

    // ============ Groups ============

    /// Create a group from the links; returns the controller's group GUID
    pub async fn create_and_assign_group(
        &self,
        links: Vec<GroupLink>,
    ) -> ConnectorResult<Option<String>> {
        log::info!("Creating and assigning group with {} links", links.len());
        let body = self
            .post(Endpoint::CreateAndAssignGroup, &GroupLinks { links })
            .await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        let response: GroupResponse = serde_json::from_str(&body)?;
        Ok(response.guid)
    }

    pub async fn unassign_group(&self, links: Vec<GroupLink>) -> ConnectorResult<()> {
        log::info!("Unassigning group with {} links", links.len());
        self.post(Endpoint::UnassignGroup, &GroupLinks { links }).await?;
        Ok(())
    }

    /// Ask the controller UI to open a device's detail view
    pub async fn open_entity_details(&self, unique_id: &str) -> ConnectorResult<()> {
        self.post(
            Endpoint::OpenEntityDetails,
            &EntityRef {
                unique_id: unique_id.to_string(),
            },
        )
        .await?;
        Ok(())
    }
}
