//! Infrastructure implementation of the `ControlPlane` port over
//! `aws-sdk-sagemaker`.
//!
//! Credentials come from the default `aws-config` chain. One SDK client is
//! kept per region, all sharing the loaded configuration.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Mutex;

use aws_config::{BehaviorVersion, Region};
use aws_sdk_sagemaker::Client;
use aws_sdk_sagemaker::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sagemaker::operation::describe_user_profile::DescribeUserProfileOutput;
use aws_sdk_sagemaker::primitives::DateTime as SdkDateTime;
use aws_sdk_sagemaker::types::AppType;
use chrono::{DateTime, Utc};
use studio_common::{AppTarget, Domain, OwnerKind};

use crate::application::ports::ControlPlane;
use crate::domain::catalog::PAGE_SIZE;
use crate::domain::error::{RequestFailure, classify_failure};
use crate::domain::{
    AppDetail, AppSummary, ControlPlaneError, Page, PresignRequest, SpaceDetail, SpaceSummary,
    UserProfileDetail, UserProfileSummary,
};

/// SageMaker control plane reached through the AWS SDK.
pub struct SageMakerControlPlane {
    sdk_config: aws_config::SdkConfig,
    clients: Mutex<HashMap<String, Client>>,
}

impl SageMakerControlPlane {
    /// Resolve credentials and shared settings from the environment.
    pub async fn load() -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest()).load().await;
        Self {
            sdk_config,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn build_client(&self, region: &str) -> Client {
        let config = aws_sdk_sagemaker::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        Client::from_conf(config)
    }

    fn client(&self, region: &str) -> Client {
        match self.clients.lock() {
            Ok(mut clients) => clients
                .entry(region.to_string())
                .or_insert_with(|| self.build_client(region))
                .clone(),
            Err(_) => self.build_client(region),
        }
    }
}

/// Classifies an SDK failure by how far the request got.
fn classify<E, R>(err: &SdkError<E, R>) -> ControlPlaneError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: Debug,
{
    let failure = match err {
        SdkError::ServiceError(e) => RequestFailure::Service(e.err().code()),
        SdkError::DispatchFailure(d) if d.is_io() || d.is_timeout() => RequestFailure::Transport,
        // Credential resolution and request building fail before dispatch.
        SdkError::DispatchFailure(_) | SdkError::ConstructionFailure(_) => RequestFailure::Local,
        _ => RequestFailure::Transport,
    };
    classify_failure(failure, DisplayErrorContext(err).to_string())
}

fn timestamp(t: Option<&SdkDateTime>) -> Option<DateTime<Utc>> {
    t.and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
}

fn user_profile_detail(out: &DescribeUserProfileOutput) -> UserProfileDetail {
    let settings = out.user_settings();
    UserProfileDetail {
        user_profile_arn: owned(out.user_profile_arn()),
        status: out.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
        execution_role: settings
            .and_then(|s| s.execution_role())
            .map(ToString::to_string),
        sso_id: out.single_sign_on_user_identifier().map(ToString::to_string),
        has_security_groups: settings.is_some_and(|s| !s.security_groups().is_empty()),
    }
}

fn owned(s: Option<&str>) -> String {
    s.unwrap_or_default().to_string()
}

fn next_token(token: Option<&str>) -> Option<String> {
    token.filter(|t| !t.is_empty()).map(ToString::to_string)
}

impl ControlPlane for SageMakerControlPlane {
    async fn list_domains(
        &self,
        region: &str,
        next: Option<String>,
    ) -> Result<Page<Domain>, ControlPlaneError> {
        tracing::debug!(region, token = ?next, "ListDomains");
        let out = self
            .client(region)
            .list_domains()
            .max_results(PAGE_SIZE)
            .set_next_token(next)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let items = out
            .domains()
            .iter()
            .map(|d| Domain {
                region: region.to_string(),
                domain_id: owned(d.domain_id()),
                domain_name: owned(d.domain_name()),
                status: d.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
                domain_arn: owned(d.domain_arn()),
                creation_time: timestamp(d.creation_time()),
                last_modified_time: timestamp(d.last_modified_time()),
                url: d.url().map(ToString::to_string),
            })
            .collect();
        Ok(Page {
            items,
            next_token: next_token(out.next_token()),
        })
    }

    async fn list_user_profiles(
        &self,
        region: &str,
        domain_id: &str,
        next: Option<String>,
    ) -> Result<Page<UserProfileSummary>, ControlPlaneError> {
        tracing::debug!(region, domain_id, token = ?next, "ListUserProfiles");
        let out = self
            .client(region)
            .list_user_profiles()
            .domain_id_equals(domain_id)
            .max_results(PAGE_SIZE)
            .set_next_token(next)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let items = out
            .user_profiles()
            .iter()
            .map(|p| UserProfileSummary {
                domain_id: p.domain_id().unwrap_or(domain_id).to_string(),
                user_profile_name: owned(p.user_profile_name()),
            })
            .collect();
        Ok(Page {
            items,
            next_token: next_token(out.next_token()),
        })
    }

    async fn describe_user_profile(
        &self,
        region: &str,
        domain_id: &str,
        user_profile_name: &str,
    ) -> Result<UserProfileDetail, ControlPlaneError> {
        tracing::debug!(region, domain_id, user_profile_name, "DescribeUserProfile");
        let out = self
            .client(region)
            .describe_user_profile()
            .domain_id(domain_id)
            .user_profile_name(user_profile_name)
            .send()
            .await
            .map_err(|e| classify(&e))?;
        Ok(user_profile_detail(&out))
    }

    async fn list_spaces(
        &self,
        region: &str,
        domain_id: &str,
        next: Option<String>,
    ) -> Result<Page<SpaceSummary>, ControlPlaneError> {
        tracing::debug!(region, domain_id, token = ?next, "ListSpaces");
        let out = self
            .client(region)
            .list_spaces()
            .domain_id_equals(domain_id)
            .max_results(PAGE_SIZE)
            .set_next_token(next)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let items = out
            .spaces()
            .iter()
            .map(|s| SpaceSummary {
                domain_id: s.domain_id().unwrap_or(domain_id).to_string(),
                space_name: owned(s.space_name()),
            })
            .collect();
        Ok(Page {
            items,
            next_token: next_token(out.next_token()),
        })
    }

    async fn describe_space(
        &self,
        region: &str,
        domain_id: &str,
        space_name: &str,
    ) -> Result<SpaceDetail, ControlPlaneError> {
        tracing::debug!(region, domain_id, space_name, "DescribeSpace");
        let out = self
            .client(region)
            .describe_space()
            .domain_id(domain_id)
            .space_name(space_name)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        Ok(SpaceDetail {
            space_arn: owned(out.space_arn()),
            status: out.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
        })
    }

    async fn list_apps(
        &self,
        region: &str,
        next: Option<String>,
    ) -> Result<Page<AppSummary>, ControlPlaneError> {
        tracing::debug!(region, token = ?next, "ListApps");
        let out = self
            .client(region)
            .list_apps()
            .max_results(PAGE_SIZE)
            .set_next_token(next)
            .send()
            .await
            .map_err(|e| classify(&e))?;

        let items = out
            .apps()
            .iter()
            .map(|a| AppSummary {
                domain_id: owned(a.domain_id()),
                user_profile_name: a.user_profile_name().map(ToString::to_string),
                space_name: a.space_name().map(ToString::to_string),
                app_type: a.app_type().map(|t| t.as_str().to_string()).unwrap_or_default(),
                app_name: owned(a.app_name()),
                status: a.status().map(|s| s.as_str().to_string()).unwrap_or_default(),
                creation_time: timestamp(a.creation_time()),
            })
            .collect();
        Ok(Page {
            items,
            next_token: next_token(out.next_token()),
        })
    }

    async fn describe_app(&self, target: &AppTarget) -> Result<AppDetail, ControlPlaneError> {
        tracing::debug!(%target, "DescribeApp");
        let mut req = self
            .client(&target.region)
            .describe_app()
            .domain_id(&target.domain_id)
            .app_type(AppType::from(target.app_type.as_str()))
            .app_name(&target.app_name);
        req = match target.owner.kind {
            OwnerKind::User => req.user_profile_name(&target.owner.name),
            OwnerKind::SharedSpace => req.space_name(&target.owner.name),
        };
        let out = req.send().await.map_err(|e| classify(&e))?;

        let spec = out.resource_spec();
        Ok(AppDetail {
            instance_type: spec
                .and_then(|s| s.instance_type())
                .map(|t| t.as_str().to_string()),
            image_arn: spec
                .and_then(|s| s.sage_maker_image_arn())
                .map(ToString::to_string),
            lifecycle_config_arn: spec
                .and_then(|s| s.lifecycle_config_arn())
                .map(ToString::to_string),
            failure_reason: out.failure_reason().map(ToString::to_string),
            last_user_activity: timestamp(out.last_user_activity_timestamp()),
        })
    }

    async fn delete_app(&self, target: &AppTarget) -> Result<(), ControlPlaneError> {
        let mut req = self
            .client(&target.region)
            .delete_app()
            .domain_id(&target.domain_id)
            .app_type(AppType::from(target.app_type.as_str()))
            .app_name(&target.app_name);
        req = match target.owner.kind {
            OwnerKind::User => req.user_profile_name(&target.owner.name),
            OwnerKind::SharedSpace => req.space_name(&target.owner.name),
        };
        req.send().await.map_err(|e| classify(&e))?;
        Ok(())
    }

    async fn create_presigned_url(
        &self,
        request: &PresignRequest,
    ) -> Result<Option<String>, ControlPlaneError> {
        tracing::debug!(
            region = %request.region,
            domain_id = %request.domain_id,
            user = %request.user_profile_name,
            space = ?request.space_name,
            "CreatePresignedDomainUrl"
        );
        let out = self
            .client(&request.region)
            .create_presigned_domain_url()
            .domain_id(&request.domain_id)
            .user_profile_name(&request.user_profile_name)
            .set_space_name(request.space_name.clone())
            .send()
            .await
            .map_err(|e| classify(&e))?;
        Ok(out.authorized_url().map(ToString::to_string))
    }
}
