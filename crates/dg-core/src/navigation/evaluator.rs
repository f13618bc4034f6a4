//! Condition evaluation
//!
//! The navigation core only needs pass/fail per condition; how skill levels
//! are computed belongs to the caller.

use super::player::SkillSnapshot;
use crate::graph::Condition;

/// Decides whether a player satisfies a condition
pub trait ConditionEvaluator {
    fn evaluate(&self, snapshot: &SkillSnapshot, condition: &Condition) -> bool;

    /// All conditions hold
    fn all_pass<'a, I>(&self, snapshot: &SkillSnapshot, conditions: I) -> bool
    where
        I: IntoIterator<Item = &'a Condition>,
        Self: Sized,
    {
        conditions.into_iter().all(|c| self.evaluate(snapshot, c))
    }

    /// First condition that does not hold
    fn first_failure<'a, I>(&self, snapshot: &SkillSnapshot, conditions: I) -> Option<&'a Condition>
    where
        I: IntoIterator<Item = &'a Condition>,
        Self: Sized,
    {
        conditions.into_iter().find(|c| !self.evaluate(snapshot, c))
    }
}

/// Compares passive skill values against difficulty; items by tag
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveEvaluator;

impl ConditionEvaluator for PassiveEvaluator {
    fn evaluate(&self, snapshot: &SkillSnapshot, condition: &Condition) -> bool {
        match condition {
            Condition::SkillCheck { skill, difficulty } => snapshot.passive(skill) >= *difficulty,
            Condition::ItemRequired { tag } => snapshot.has_item(tag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::player::Attribute;

    #[test]
    fn test_skill_check_threshold() {
        let snap = SkillSnapshot::new().with_skill("Perception", 25);
        let eval = PassiveEvaluator;
        assert!(eval.evaluate(&snap, &Condition::perception(35)));
        assert!(!eval.evaluate(&snap, &Condition::perception(36)));
    }

    #[test]
    fn test_item_required() {
        let eval = PassiveEvaluator;
        let cond = Condition::ItemRequired {
            tag: "torch".to_string(),
        };
        assert!(!eval.evaluate(&SkillSnapshot::new(), &cond));
        assert!(eval.evaluate(&SkillSnapshot::new().with_item("torch"), &cond));
    }

    #[test]
    fn test_first_failure() {
        let snap = SkillSnapshot::new().with_attribute(Attribute::Strength, 18);
        let conds = vec![
            Condition::SkillCheck {
                skill: "Athletics".to_string(),
                difficulty: 14,
            },
            Condition::ItemRequired {
                tag: "rope".to_string(),
            },
        ];
        let eval = PassiveEvaluator;
        assert!(!eval.all_pass(&snap, &conds));
        assert_eq!(eval.first_failure(&snap, &conds), Some(&conds[1]));
    }
}
