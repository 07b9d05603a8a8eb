//! Reusable attribute plan modifiers
//!
//! Plan modifiers run after the proposed new state has been computed and can:
//! - Modify the planned value
//! - Mark an attribute as requiring replacement
//! - Add warnings or errors to the plan

use crate::schema::{PlanModifier, PlanModifierRequest, PlanModifierResponse};
use crate::types::{Dynamic, DynamicValue};

/// Marks an attribute as requiring replacement when it changes on an
/// existing resource
pub struct RequiresReplace;

impl RequiresReplace {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for RequiresReplace {
    fn description(&self) -> String {
        "If the value of this attribute changes, the resource will be destroyed and recreated"
            .to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        let requires_replace = !request.creating
            && !matches!(
                (&request.state_value.value, &request.plan_value.value),
                (Dynamic::Unknown, _) | (_, Dynamic::Unknown)
            )
            && request.state_value != request.plan_value;

        PlanModifierResponse {
            plan_value: request.plan_value,
            requires_replace,
            diagnostics: vec![],
        }
    }
}

/// Uses the prior state value when the planned value is unknown
///
/// Keeps computed attributes such as remote ids stable across plans instead
/// of showing them as "known after apply".
pub struct UseStateForUnknown;

impl UseStateForUnknown {
    pub fn create() -> Box<dyn PlanModifier> {
        Box::new(Self)
    }
}

impl PlanModifier for UseStateForUnknown {
    fn description(&self) -> String {
        "Once set, the value of this attribute in state will not change".to_string()
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        if request.plan_value.is_unknown() && !request.state_value.is_null() {
            return PlanModifierResponse {
                plan_value: request.state_value,
                requires_replace: false,
                diagnostics: vec![],
            };
        }
        PlanModifierResponse::unchanged(request)
    }
}

/// Substitutes a static value when neither config nor plan carry one
///
/// Only null or unknown plans are replaced, so running it twice, or after
/// another modifier already filled the plan, changes nothing.
pub struct DefaultValue {
    value: Dynamic,
}

impl DefaultValue {
    pub fn create(value: Dynamic) -> Box<dyn PlanModifier> {
        Box::new(Self { value })
    }

    pub fn string(value: &str) -> Box<dyn PlanModifier> {
        Self::create(Dynamic::String(value.to_string()))
    }

    pub fn number(value: f64) -> Box<dyn PlanModifier> {
        Self::create(Dynamic::Number(value))
    }

    pub fn bool(value: bool) -> Box<dyn PlanModifier> {
        Self::create(Dynamic::Bool(value))
    }
}

impl PlanModifier for DefaultValue {
    fn description(&self) -> String {
        format!("Defaults to {:?} when not configured", self.value)
    }

    fn modify(&self, request: PlanModifierRequest) -> PlanModifierResponse {
        let config_unset = !request.config_value.value.is_known();
        let plan_unset = !request.plan_value.value.is_known();
        if config_unset && plan_unset {
            return PlanModifierResponse {
                plan_value: DynamicValue::new(self.value.clone()),
                requires_replace: false,
                diagnostics: vec![],
            };
        }
        PlanModifierResponse::unchanged(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttributePath;

    fn request(config: Dynamic, state: Dynamic, plan: Dynamic, creating: bool) -> PlanModifierRequest {
        PlanModifierRequest {
            config_value: DynamicValue::new(config),
            state_value: DynamicValue::new(state),
            plan_value: DynamicValue::new(plan),
            path: AttributePath::new("name"),
            creating,
        }
    }

    #[test]
    fn requires_replace_does_not_trigger_on_same_value() {
        let response = RequiresReplace.modify(request(
            "hello".into(),
            "hello".into(),
            "hello".into(),
            false,
        ));
        assert!(!response.requires_replace);
        assert!(response.diagnostics.is_empty());
    }

    #[test]
    fn requires_replace_triggers_on_different_value() {
        let response = RequiresReplace.modify(request(
            "world".into(),
            "hello".into(),
            "world".into(),
            false,
        ));
        assert!(response.requires_replace);
        assert_eq!(response.plan_value.value, Dynamic::from("world"));
    }

    #[test]
    fn requires_replace_triggers_when_value_is_removed() {
        let response = RequiresReplace.modify(request(
            Dynamic::Null,
            "hello".into(),
            Dynamic::Null,
            false,
        ));
        assert!(response.requires_replace);
    }

    #[test]
    fn requires_replace_ignores_create() {
        let response = RequiresReplace.modify(request(
            "hello".into(),
            Dynamic::Null,
            "hello".into(),
            true,
        ));
        assert!(!response.requires_replace);
    }

    #[test]
    fn requires_replace_ignores_unknown_values() {
        let response = RequiresReplace.modify(request(
            Dynamic::Unknown,
            "value".into(),
            Dynamic::Unknown,
            false,
        ));
        assert!(!response.requires_replace);
    }

    #[test]
    fn use_state_for_unknown_copies_state() {
        let response = UseStateForUnknown.modify(request(
            Dynamic::Null,
            "10001".into(),
            Dynamic::Unknown,
            false,
        ));
        assert_eq!(response.plan_value.value, Dynamic::from("10001"));
    }

    #[test]
    fn use_state_for_unknown_keeps_unknown_without_state() {
        let response =
            UseStateForUnknown.modify(request(Dynamic::Null, Dynamic::Null, Dynamic::Unknown, true));
        assert!(response.plan_value.is_unknown());
    }

    #[test]
    fn use_state_for_unknown_leaves_known_plan() {
        let response = UseStateForUnknown.modify(request(
            "new".into(),
            "old".into(),
            "new".into(),
            false,
        ));
        assert_eq!(response.plan_value.value, Dynamic::from("new"));
    }

    #[test]
    fn default_value_fills_unset_plan() {
        let modifier = DefaultValue::string("");
        let response = modifier.modify(request(Dynamic::Null, Dynamic::Null, Dynamic::Unknown, true));
        assert_eq!(response.plan_value.value, Dynamic::from(""));
    }

    #[test]
    fn default_value_respects_configured_value() {
        let modifier = DefaultValue::bool(false);
        let response = modifier.modify(request(
            Dynamic::Bool(true),
            Dynamic::Null,
            Dynamic::Bool(true),
            true,
        ));
        assert_eq!(response.plan_value.value, Dynamic::Bool(true));
    }

    #[test]
    fn default_value_is_idempotent() {
        let modifier = DefaultValue::string(" ");
        let once = modifier.modify(request(Dynamic::Null, Dynamic::Null, Dynamic::Unknown, true));
        let twice = modifier.modify(request(
            Dynamic::Null,
            Dynamic::Null,
            once.plan_value.value.clone(),
            true,
        ));
        assert_eq!(once.plan_value, twice.plan_value);
    }

    #[test]
    fn default_value_does_not_override_state_kept_by_earlier_modifier() {
        let kept = UseStateForUnknown.modify(request(
            Dynamic::Null,
            "existing".into(),
            Dynamic::Unknown,
            false,
        ));
        let response = DefaultValue::string("").modify(request(
            Dynamic::Null,
            "existing".into(),
            kept.plan_value.value,
            false,
        ));
        assert_eq!(response.plan_value.value, Dynamic::from("existing"));
    }
}
