//! Fail-fast rule evaluation.

use crate::document::ResponseDocument;
use crate::obs::emit_rule_evaluated;
use crate::report::TestReport;
use crate::rules::RuleSet;
use crate::target::Target;

/// Runs a [`RuleSet`] against documents, one target at a time.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    rules: RuleSet,
}

impl Validator {
    /// Evaluate rules in order, stopping after the first failing outcome.
    pub fn validate(&self, target: &Target, doc: &ResponseDocument) -> TestReport {
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in self.rules.iter() {
            let outcome = rule.evaluate(doc);
            emit_rule_evaluated(target.as_str(), rule.name(), outcome.passed);

            let failed = !outcome.passed;
            outcomes.push(outcome);
            if failed {
                break;
            }
        }

        TestReport::evaluated(target.clone(), outcomes, self.rules.len())
    }
}
