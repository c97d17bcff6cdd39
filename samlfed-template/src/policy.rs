use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const POLICY_VERSION: &str = "2012-10-17";

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self {
            version: POLICY_VERSION.to_owned(),
            statements,
        }
    }

    pub fn to_value(&self) -> Value {
        // string keys only, serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Statement mirrors one IAM policy statement. Resources and principals
/// are kept as json values so template intrinsics can stand in for
/// literal ARNs.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<Principal>,
    pub action: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl Statement {
    pub fn allow<I, S>(actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            effect: Effect::Allow,
            principal: None,
            action: actions.into_iter().map(Into::into).collect(),
            resource: None,
            condition: None,
        }
    }

    pub fn principal(mut self, principal: Principal) -> Self {
        self.principal = Some(principal);
        self
    }

    pub fn resource(mut self, resource: Value) -> Self {
        self.resource.get_or_insert_with(Vec::new).push(resource);
        self
    }

    /// condition adds `key` under the operator `op`, e.g.
    /// `("StringEquals", "SAML:aud", ...)`.
    pub fn condition(mut self, op: &str, key: &str, value: Value) -> Self {
        self.condition
            .get_or_insert_with(BTreeMap::new)
            .entry(op.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
        self
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum Principal {
    Federated(Value),
    Service(String),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn statement_shape() {
        let doc = PolicyDocument::new(vec![Statement::allow([
            "sts:AssumeRoleWithSAML",
        ])
        .principal(Principal::Federated(json!("arn:aws:iam::1:saml-provider/idp")))
        .condition("StringEquals", "SAML:aud", json!("aud"))]);

        assert_eq!(
            doc.to_value(),
            json!({
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": {"Federated": "arn:aws:iam::1:saml-provider/idp"},
                    "Action": ["sts:AssumeRoleWithSAML"],
                    "Condition": {"StringEquals": {"SAML:aud": "aud"}}
                }]
            })
        );
    }

    #[test]
    fn resources_accumulate() {
        let stmt = Statement::allow(["s3:GetObject"])
            .resource(json!("a"))
            .resource(json!("b"));
        assert_eq!(stmt.resource, Some(vec![json!("a"), json!("b")]));
        assert!(stmt.principal.is_none());
    }

    #[test]
    fn parses_back() {
        let raw = json!({
            "Version": "2012-10-17",
            "Statement": [{
                "Effect": "Deny",
                "Principal": {"Service": "lambda.amazonaws.com"},
                "Action": ["sts:AssumeRole"]
            }]
        });
        let doc: PolicyDocument = serde_json::from_value(raw).unwrap();
        assert_eq!(doc.statements[0].effect, Effect::Deny);
        assert_eq!(
            doc.statements[0].principal,
            Some(Principal::Service("lambda.amazonaws.com".to_owned()))
        );
    }
}
