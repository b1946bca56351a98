use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::decimal::Money;
use crate::rules::Breakdown;

pub type MemberId = Uuid;
pub type OrganizationId = Uuid;
pub type RuleId = Uuid;
pub type AssignmentId = Uuid;
pub type TransactionId = Uuid;

/// how often a rule bills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingFrequency {
    Monthly,
    Quarterly,
    Annual,
}

/// dues transaction lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// created by a billing run, awaiting payment
    Pending,
    /// past due date (set by external collaborators, not the late fee job)
    Overdue,
    /// settled by the payment collaborator
    Paid,
    /// reversed by a correcting transaction
    Cancelled,
}

/// the fixed set of input fields a percentage or formula rule may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseField {
    GrossWages,
    BaseSalary,
    HourlyRate,
    HoursWorked,
}

impl BaseField {
    pub const ALL: [BaseField; 4] = [
        BaseField::GrossWages,
        BaseField::BaseSalary,
        BaseField::HourlyRate,
        BaseField::HoursWorked,
    ];

    /// variable name as it appears in formulas and rule definitions
    pub fn name(&self) -> &'static str {
        match self {
            BaseField::GrossWages => "grossWages",
            BaseField::BaseSalary => "baseSalary",
            BaseField::HourlyRate => "hourlyRate",
            BaseField::HoursWorked => "hoursWorked",
        }
    }
}

impl fmt::Display for BaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// unknown field names must be an explicit outcome, not a silent zero lookup
impl FromStr for BaseField {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "grossWages" => Ok(BaseField::GrossWages),
            "baseSalary" => Ok(BaseField::BaseSalary),
            "hourlyRate" => Ok(BaseField::HourlyRate),
            "hoursWorked" => Ok(BaseField::HoursWorked),
            _ => Err(()),
        }
    }
}

/// per-calculation numeric inputs, resolved from the member's most recent
/// transaction breakdown; absent fields count as zero
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct CalculationInputs {
    pub gross_wages: Option<Decimal>,
    pub base_salary: Option<Decimal>,
    pub hourly_rate: Option<Decimal>,
    pub hours_worked: Option<Decimal>,
}

impl CalculationInputs {
    /// look up a field by its tag
    pub fn get(&self, field: BaseField) -> Option<Decimal> {
        match field {
            BaseField::GrossWages => self.gross_wages,
            BaseField::BaseSalary => self.base_salary,
            BaseField::HourlyRate => self.hourly_rate,
            BaseField::HoursWorked => self.hours_worked,
        }
    }

    /// field value with the zero default applied
    pub fn get_or_zero(&self, field: BaseField) -> Decimal {
        self.get(field).unwrap_or(Decimal::ZERO)
    }

    /// variable map for the formula evaluator
    pub fn variables(&self) -> Vec<(&'static str, f64)> {
        BaseField::ALL
            .iter()
            .map(|f| {
                (
                    f.name(),
                    self.get_or_zero(*f).to_f64().unwrap_or(0.0),
                )
            })
            .collect()
    }
}

/// binds a member to one dues rule for a contiguous time range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberDuesAssignment {
    pub id: AssignmentId,
    pub member_id: MemberId,
    pub rule_id: RuleId,
    pub effective_date: NaiveDate,
    /// open-ended when absent
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
    /// fixed per-member charge that bypasses rule calculation entirely
    pub override_amount: Option<Money>,
}

impl MemberDuesAssignment {
    /// does this assignment cover the given period start?
    pub fn covers(&self, period_start: NaiveDate) -> bool {
        self.is_active
            && self.effective_date <= period_start
            && self.end_date.map_or(true, |end| end >= period_start)
    }
}

/// financial record produced by a billing run; never edited after the fact
/// except for the one-time late fee application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuesTransaction {
    pub id: TransactionId,
    pub member_id: MemberId,
    pub organization_id: OrganizationId,
    pub assignment_id: AssignmentId,
    pub rule_id: Option<RuleId>,
    /// base dues amount
    pub amount: Money,
    pub late_fee_amount: Money,
    pub total_amount: Money,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub due_date: NaiveDate,
    pub status: TransactionStatus,
    /// calculation provenance; also seeds the next period's inputs
    pub breakdown: Breakdown,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_base_field_parse() {
        assert_eq!("grossWages".parse(), Ok(BaseField::GrossWages));
        assert_eq!("hoursWorked".parse(), Ok(BaseField::HoursWorked));
        assert!("netWages".parse::<BaseField>().is_err());
        // case sensitive by design
        assert!("grosswages".parse::<BaseField>().is_err());
    }

    #[test]
    fn test_inputs_default_to_zero() {
        let inputs = CalculationInputs::default();
        assert_eq!(inputs.get_or_zero(BaseField::GrossWages), Decimal::ZERO);

        let vars = inputs.variables();
        assert_eq!(vars.len(), 4);
        assert!(vars.iter().all(|(_, v)| *v == 0.0));
    }

    #[test]
    fn test_assignment_covers() {
        let assignment = MemberDuesAssignment {
            id: Uuid::new_v4(),
            member_id: Uuid::new_v4(),
            rule_id: Uuid::new_v4(),
            effective_date: date(2024, 1, 1),
            end_date: Some(date(2024, 6, 30)),
            is_active: true,
            override_amount: None,
        };

        assert!(assignment.covers(date(2024, 1, 1)));
        assert!(assignment.covers(date(2024, 6, 30)));
        assert!(!assignment.covers(date(2023, 12, 31)));
        assert!(!assignment.covers(date(2024, 7, 1)));

        let inactive = MemberDuesAssignment { is_active: false, ..assignment.clone() };
        assert!(!inactive.covers(date(2024, 3, 1)));

        let open_ended = MemberDuesAssignment { end_date: None, ..assignment };
        assert!(open_ended.covers(date(2030, 1, 1)));
    }
}
