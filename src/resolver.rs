use chrono::NaiveDate;

use crate::decimal::Money;
use crate::errors::{DuesError, Result};
use crate::rules::{self, Breakdown};
use crate::schedule::{self, BillingPeriod};
use crate::store::{FinancialHistory, RuleCatalog};
use crate::types::{AssignmentId, BillingFrequency, MemberId, OrganizationId, RuleId};

/// one member's resolved charge for a billing period
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedDues {
    pub assignment_id: AssignmentId,
    pub rule_id: Option<RuleId>,
    pub amount: Money,
    pub breakdown: Breakdown,
    pub due_date: NaiveDate,
}

/// resolve what a member owes for a period
///
/// `Ok(None)` means no active assignment covers the period start and the
/// member is skipped. an override amount on the assignment short-circuits
/// rule calculation entirely. otherwise calculation inputs come from the
/// member's most recent transaction breakdown, so one period's output is
/// the next period's input.
///
/// more than one covering assignment is a data integrity violation and is
/// surfaced as an error rather than silently picking one, since an
/// arbitrary pick could misbill the member.
pub fn resolve_for_member(
    catalog: &dyn RuleCatalog,
    history: &dyn FinancialHistory,
    organization_id: OrganizationId,
    member_id: MemberId,
    period: BillingPeriod,
) -> Result<Option<ResolvedDues>> {
    let assignments = catalog.active_assignments(member_id, period.start)?;
    let mut covering = assignments
        .into_iter()
        .filter(|a| a.covers(period.start))
        .collect::<Vec<_>>();

    let assignment = match covering.len() {
        0 => return Ok(None),
        1 => covering.remove(0),
        count => {
            return Err(DuesError::AmbiguousAssignment {
                member_id,
                period_start: period.start,
                count,
            })
        }
    };

    if let Some(amount) = assignment.override_amount {
        // the due-date offset does not vary by frequency, so a missing rule
        // does not block an overridden assignment
        let frequency = catalog
            .rule(assignment.rule_id)?
            .map(|rule| rule.billing_frequency)
            .unwrap_or(BillingFrequency::Monthly);

        return Ok(Some(ResolvedDues {
            assignment_id: assignment.id,
            rule_id: Some(assignment.rule_id),
            amount,
            breakdown: Breakdown::Override { amount },
            due_date: schedule::due_date(period.end, frequency),
        }));
    }

    let rule = catalog
        .rule(assignment.rule_id)?
        .ok_or(DuesError::RuleNotFound {
            rule_id: assignment.rule_id,
        })?;

    let inputs = history
        .latest_breakdown(organization_id, member_id)?
        .map(|breakdown| breakdown.to_inputs())
        .unwrap_or_default();

    let result = rules::calculate(&rule, &inputs);

    Ok(Some(ResolvedDues {
        assignment_id: assignment.id,
        rule_id: Some(rule.id),
        amount: result.amount,
        breakdown: result.breakdown,
        due_date: schedule::due_date(period.end, rule.billing_frequency),
    }))
}
