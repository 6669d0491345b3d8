//! Contract input model and related types.
//!
//! A [`ContractInput`] describes one job offer: where and when it runs, how it
//! pays, which stipends and deductions come with it, and how the worker files
//! taxes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::tax::{FilingStatus, PayFrequency};
use super::validation::Violations;
use crate::error::Violation;

/// Overtime starts after this many hours a week unless the contract says otherwise.
pub const DEFAULT_OVERTIME_THRESHOLD: Decimal = Decimal::from_parts(40, 0, 0, false, 0);

/// Overtime pays this multiple of the hourly rate unless the contract says otherwise.
pub const DEFAULT_OVERTIME_MULTIPLIER: Decimal = Decimal::from_parts(15, 0, 0, false, 1);

/// Longest contract the engine accepts, in weeks (ten years).
pub const MAX_DURATION_WEEKS: Decimal = Decimal::from_parts(520, 0, 0, false, 0);

const DAYS_PER_WEEK: Decimal = Decimal::from_parts(7, 0, 0, false, 0);
const MAX_HOURS_PER_WEEK: Decimal = Decimal::from_parts(168, 0, 0, false, 0);

/// The kind of engagement an offer represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractType {
    /// Temporary assignment covering for another clinician.
    LocumTenens,
    /// Permanent employment.
    Permanent,
    /// Contract with a path to a permanent position.
    ContractToHire,
    /// Travel assignment.
    Travel,
    /// Independent consulting engagement.
    Consulting,
}

/// Where the work is performed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Two-letter US state code.
    pub state: String,
    /// City, used for cost-of-living lookups.
    #[serde(default)]
    pub city: Option<String>,
    /// ZIP code.
    #[serde(default)]
    pub zip_code: Option<String>,
}

/// Category of a one-off bonus payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusType {
    /// Paid on signing.
    Signing,
    /// Paid on completing the assignment.
    Completion,
    /// Paid for staying past a milestone.
    Retention,
    /// Paid for meeting performance targets.
    Performance,
    /// Paid for referring another clinician.
    Referral,
    /// Anything else.
    Other,
}

/// A bonus payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    /// Bonus category.
    pub bonus_type: BonusType,
    /// Amount paid.
    pub amount: Decimal,
    /// Whether the bonus is taxable wages.
    #[serde(default = "default_true")]
    pub taxable: bool,
}

fn default_true() -> bool {
    true
}

/// Stipend categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StipendCategory {
    /// Lodging.
    Housing,
    /// Mileage, airfare and rental cars.
    Travel,
    /// Meals and incidentals.
    Meals,
    /// State licensure fees.
    Licensure,
    /// Malpractice insurance.
    Malpractice,
    /// Continuing medical education.
    Cme,
    /// Anything else.
    Other,
}

impl StipendCategory {
    /// Every stipend category, in display order.
    pub const ALL: [StipendCategory; 7] = [
        StipendCategory::Housing,
        StipendCategory::Travel,
        StipendCategory::Meals,
        StipendCategory::Licensure,
        StipendCategory::Malpractice,
        StipendCategory::Cme,
        StipendCategory::Other,
    ];

    /// Returns the snake_case field name for this category.
    pub fn field_name(self) -> &'static str {
        match self {
            StipendCategory::Housing => "housing",
            StipendCategory::Travel => "travel",
            StipendCategory::Meals => "meals",
            StipendCategory::Licensure => "licensure",
            StipendCategory::Malpractice => "malpractice",
            StipendCategory::Cme => "cme",
            StipendCategory::Other => "other",
        }
    }

    /// True for per diem style allowances that are only tax-free while
    /// working away from the worker's tax home.
    pub fn is_travel_expense(self) -> bool {
        matches!(
            self,
            StipendCategory::Housing | StipendCategory::Travel | StipendCategory::Meals
        )
    }
}

/// Stipend amounts for the whole contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stipends {
    /// Lodging.
    pub housing: Decimal,
    /// Travel.
    pub travel: Decimal,
    /// Meals and incidentals.
    pub meals: Decimal,
    /// Licensure.
    pub licensure: Decimal,
    /// Malpractice insurance.
    pub malpractice: Decimal,
    /// Continuing medical education.
    pub cme: Decimal,
    /// Other.
    pub other: Decimal,
}

impl Stipends {
    /// Returns the amount for one category.
    pub fn amount(&self, category: StipendCategory) -> Decimal {
        match category {
            StipendCategory::Housing => self.housing,
            StipendCategory::Travel => self.travel,
            StipendCategory::Meals => self.meals,
            StipendCategory::Licensure => self.licensure,
            StipendCategory::Malpractice => self.malpractice,
            StipendCategory::Cme => self.cme,
            StipendCategory::Other => self.other,
        }
    }

    /// Returns every category with its amount.
    pub fn entries(&self) -> impl Iterator<Item = (StipendCategory, Decimal)> + '_ {
        StipendCategory::ALL
            .into_iter()
            .map(move |category| (category, self.amount(category)))
    }

    /// Returns the sum of all stipends.
    pub fn total(&self) -> Decimal {
        self.entries().map(|(_, amount)| amount).sum()
    }
}

/// Kind of insurance premium withheld.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceKind {
    /// Medical.
    Health,
    /// Dental.
    Dental,
    /// Vision.
    Vision,
    /// Life.
    Life,
    /// Disability.
    Disability,
}

/// Who a policy covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageTier {
    /// The worker alone.
    #[default]
    EmployeeOnly,
    /// The worker and a spouse.
    EmployeeSpouse,
    /// The worker and children.
    EmployeeChildren,
    /// The whole family.
    Family,
}

/// An insurance premium deducted over the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceDeduction {
    /// Kind of insurance.
    pub kind: InsuranceKind,
    /// Coverage tier.
    #[serde(default)]
    pub tier: CoverageTier,
    /// Total premium over the contract.
    pub amount: Decimal,
}

/// Retirement contribution, as a fixed amount or a share of compensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetirementContribution {
    /// A fixed dollar amount over the contract.
    Amount(Decimal),
    /// A percentage (0-100) of compensation.
    Percentage(Decimal),
}

impl RetirementContribution {
    /// Returns the contribution in dollars for the given compensation.
    pub fn resolve(self, compensation: Decimal) -> Decimal {
        match self {
            RetirementContribution::Amount(amount) => amount,
            RetirementContribution::Percentage(percent) => {
                compensation * percent / Decimal::ONE_HUNDRED
            }
        }
    }
}

/// Deductions taken from pay over the contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deductions {
    /// Insurance premiums.
    pub insurance: Vec<InsuranceDeduction>,
    /// Retirement contribution.
    pub retirement: Option<RetirementContribution>,
    /// Association dues and professional fees.
    pub professional_fees: Decimal,
    /// Parking.
    pub parking: Decimal,
    /// Anything else.
    pub other: Decimal,
}

/// How the worker files and withholds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInfo {
    /// Federal filing status.
    pub filing_status: FilingStatus,
    /// Federal exemptions claimed.
    pub federal_exemptions: u32,
    /// State exemptions claimed.
    pub state_exemptions: u32,
    /// Extra federal withholding over the contract.
    pub additional_federal_withholding: Decimal,
    /// Extra state withholding over the contract.
    pub additional_state_withholding: Decimal,
    /// True when the worker lives where the contract is, i.e. is not
    /// travelling away from a tax home.
    pub is_resident: bool,
}

/// One contract offer.
///
/// # Example
///
/// ```
/// use locum_calc::models::ContractInput;
///
/// let contract: ContractInput = serde_json::from_str(r#"{
///     "specialty": "Anesthesiology",
///     "location": { "state": "TX", "city": "Austin" },
///     "contract_type": "locum_tenens",
///     "start_date": "2025-01-06",
///     "end_date": "2025-04-07",
///     "hourly_rate": "100",
///     "hours_per_week": "40"
/// }"#).unwrap();
///
/// assert_eq!(contract.weeks(), rust_decimal::Decimal::from(13));
/// assert!(contract.validate().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInput {
    /// Label used when comparing offers.
    #[serde(default)]
    pub name: Option<String>,
    /// Clinical specialty.
    pub specialty: String,
    /// Work location.
    pub location: Location,
    /// Kind of engagement.
    pub contract_type: ContractType,
    /// First day of the contract.
    pub start_date: NaiveDate,
    /// Last day of the contract; must be after `start_date`.
    pub end_date: NaiveDate,
    /// Overrides the duration derived from the dates.
    #[serde(default)]
    pub duration_weeks: Option<Decimal>,
    /// Base hourly rate.
    pub hourly_rate: Decimal,
    /// Scheduled hours per week (1-168).
    pub hours_per_week: Decimal,
    /// Overtime hourly rate; defaults to 1.5x the base rate.
    #[serde(default)]
    pub overtime_rate: Option<Decimal>,
    /// Weekly hours after which overtime applies; defaults to 40.
    #[serde(default)]
    pub overtime_threshold: Option<Decimal>,
    /// Bonus payments.
    #[serde(default)]
    pub bonuses: Vec<Bonus>,
    /// Stipends.
    #[serde(default)]
    pub stipends: Stipends,
    /// Deductions.
    #[serde(default)]
    pub deductions: Deductions,
    /// Tax filing information.
    #[serde(default)]
    pub tax_info: TaxInfo,
    /// Pay frequency for per-period figures; defaults to bi-weekly.
    #[serde(default)]
    pub pay_frequency: Option<PayFrequency>,
}

impl ContractInput {
    /// Returns the label shown in comparisons.
    ///
    /// Unnamed contracts are labelled from their own content, never their
    /// position in a list.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!(
                "{} ({})",
                self.specialty.trim(),
                self.location.state.trim().to_ascii_uppercase()
            ),
        }
    }

    /// Returns the number of days between start and end dates.
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// Returns the contract length in weeks, fractional weeks included.
    pub fn weeks(&self) -> Decimal {
        self.duration_weeks
            .unwrap_or_else(|| Decimal::from(self.duration_days()) / DAYS_PER_WEEK)
    }

    /// Returns the weekly overtime threshold.
    pub fn overtime_threshold(&self) -> Decimal {
        self.overtime_threshold.unwrap_or(DEFAULT_OVERTIME_THRESHOLD)
    }

    /// Returns the overtime hourly rate.
    pub fn overtime_rate(&self) -> Decimal {
        self.overtime_rate
            .unwrap_or(self.hourly_rate * DEFAULT_OVERTIME_MULTIPLIER)
    }

    /// Returns the pay frequency used for per-period figures.
    pub fn pay_frequency(&self) -> PayFrequency {
        self.pay_frequency.unwrap_or_default()
    }

    /// Checks every field and returns all violations found.
    pub fn validate(&self) -> Vec<Violation> {
        let mut v = Violations::default();

        v.not_blank("specialty", &self.specialty);
        v.state_code("location.state", &self.location.state);

        if self.end_date <= self.start_date {
            v.push("end_date", "must be after start_date");
        }
        match self.duration_weeks {
            Some(weeks) => {
                // Shortest contract is one day
                if weeks <= Decimal::ZERO
                    || weeks > MAX_DURATION_WEEKS
                    || weeks * DAYS_PER_WEEK < Decimal::ONE
                {
                    v.push(
                        "duration_weeks",
                        format!("must be at least one day and at most {} weeks", MAX_DURATION_WEEKS),
                    );
                }
            }
            None => {
                if self.end_date > self.start_date && self.weeks() > MAX_DURATION_WEEKS {
                    v.push(
                        "end_date",
                        format!("contract must not run longer than {} weeks", MAX_DURATION_WEEKS),
                    );
                }
            }
        }

        v.amount("hourly_rate", self.hourly_rate);
        v.in_range("hours_per_week", self.hours_per_week, Decimal::ONE, MAX_HOURS_PER_WEEK);
        if let Some(rate) = self.overtime_rate {
            v.amount("overtime_rate", rate);
        }
        if let Some(threshold) = self.overtime_threshold {
            v.in_range("overtime_threshold", threshold, Decimal::ZERO, MAX_HOURS_PER_WEEK);
        }

        for (i, bonus) in self.bonuses.iter().enumerate() {
            v.amount(&format!("bonuses[{}].amount", i), bonus.amount);
        }
        for (category, amount) in self.stipends.entries() {
            v.amount(&format!("stipends.{}", category.field_name()), amount);
        }

        for (i, insurance) in self.deductions.insurance.iter().enumerate() {
            v.amount(&format!("deductions.insurance[{}].amount", i), insurance.amount);
        }
        match self.deductions.retirement {
            Some(RetirementContribution::Amount(amount)) => {
                v.amount("deductions.retirement.amount", amount)
            }
            Some(RetirementContribution::Percentage(percent)) => v.in_range(
                "deductions.retirement.percentage",
                percent,
                Decimal::ZERO,
                Decimal::ONE_HUNDRED,
            ),
            None => {}
        }
        v.amount("deductions.professional_fees", self.deductions.professional_fees);
        v.amount("deductions.parking", self.deductions.parking);
        v.amount("deductions.other", self.deductions.other);

        v.amount(
            "tax_info.additional_federal_withholding",
            self.tax_info.additional_federal_withholding,
        );
        v.amount(
            "tax_info.additional_state_withholding",
            self.tax_info.additional_state_withholding,
        );

        v.into_vec()
    }
}
