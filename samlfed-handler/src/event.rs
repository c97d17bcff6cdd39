use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle stage the orchestration service is driving the resource
/// through. Unknown stages are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RequestType {
    Create,
    Update,
    Delete,
    Other(String),
}

impl From<String> for RequestType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Create" => Self::Create,
            "Update" => Self::Update,
            "Delete" => Self::Delete,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for RequestType {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

impl From<RequestType> for String {
    fn from(value: RequestType) -> Self {
        value.to_string()
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("Create"),
            Self::Update => f.write_str("Update"),
            Self::Delete => f.write_str("Delete"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// LifecycleEvent is the custom resource request delivered to the handler.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    pub request_type: RequestType,
    /// Presigned URL the response must be PUT to.
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    #[serde(default)]
    pub resource_type: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Success,
    Failed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResponseData {
    #[serde(rename = "Response")]
    pub response: String,
}

/// CustomResourceResponse is the body PUT back to the response URL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: Status,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: ResponseData,
}

impl CustomResourceResponse {
    pub fn new(
        event: &LifecycleEvent,
        status: Status,
        reason: String,
        physical_resource_id: String,
    ) -> Self {
        Self {
            status,
            reason,
            physical_resource_id,
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            no_echo: false,
            data: ResponseData::default(),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample(request_type: &str) -> Value {
    serde_json::json!({
        "RequestType": request_type,
        "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:handler",
        "ResponseURL": "https://cloudformation-custom-resource-response-euwest1.s3.amazonaws.com/signed",
        "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/federation/guid",
        "RequestId": "5d478078-13e9-baf0-464a-7ef285ecc786",
        "LogicalResourceId": "SamlProvider",
        "ResourceType": "Custom::SamlProvider",
        "ResourceProperties": {
            "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:handler",
            "ProviderName": "idp"
        }
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_create() {
        let event: LifecycleEvent =
            serde_json::from_value(sample("Create")).unwrap();
        assert_eq!(event.request_type, RequestType::Create);
        assert_eq!(event.logical_resource_id, "SamlProvider");
        assert!(event.physical_resource_id.is_none());
        assert!(event.response_url.starts_with("https://"));
        assert_eq!(event.resource_properties["ProviderName"], "idp");
    }

    #[test]
    fn parse_unknown_type() {
        let event: LifecycleEvent =
            serde_json::from_value(sample("Rollback")).unwrap();
        assert_eq!(event.request_type, RequestType::Other("Rollback".into()));
        assert_eq!(event.request_type.to_string(), "Rollback");
    }

    #[test]
    fn parse_delete_with_physical_id() {
        let mut raw = sample("Delete");
        raw["PhysicalResourceId"] =
            json!("arn:aws:iam::123456789012:saml-provider/idp");
        let event: LifecycleEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.request_type, RequestType::Delete);
        assert_eq!(
            event.physical_resource_id.as_deref(),
            Some("arn:aws:iam::123456789012:saml-provider/idp")
        );
    }

    #[test]
    fn response_shape() {
        let event: LifecycleEvent =
            serde_json::from_value(sample("Update")).unwrap();
        let response = CustomResourceResponse::new(
            &event,
            Status::Success,
            "done".to_owned(),
            "physical".to_owned(),
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "Status": "SUCCESS",
                "Reason": "done",
                "PhysicalResourceId": "physical",
                "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/federation/guid",
                "RequestId": "5d478078-13e9-baf0-464a-7ef285ecc786",
                "LogicalResourceId": "SamlProvider",
                "NoEcho": false,
                "Data": {"Response": ""}
            })
        );
    }

    #[test]
    fn request_type_round_trips_as_string() {
        assert_eq!(
            serde_json::to_value(RequestType::Delete).unwrap(),
            json!("Delete")
        );
        assert_eq!(RequestType::from("Create"), RequestType::Create);
    }
}
