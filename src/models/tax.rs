//! Filing status, pay frequency and tax breakdown models.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Federal filing status used to select brackets and the standard deduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    /// Single filer.
    #[default]
    Single,
    /// Married, filing a joint return.
    MarriedFilingJointly,
    /// Married, filing separate returns.
    MarriedFilingSeparately,
    /// Head of household.
    HeadOfHousehold,
}

impl FilingStatus {
    /// Every filing status.
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedFilingJointly,
        FilingStatus::MarriedFilingSeparately,
        FilingStatus::HeadOfHousehold,
    ];
}

/// How often wages are paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// 52 pay periods per year.
    Weekly,
    /// 26 pay periods per year.
    #[default]
    BiWeekly,
    /// 24 pay periods per year (1st-15th, 16th-end of month).
    SemiMonthly,
    /// 12 pay periods per year.
    Monthly,
    /// 4 pay periods per year.
    Quarterly,
    /// 1 pay period per year.
    Annually,
}

impl PayFrequency {
    /// Returns the number of pay periods in a year.
    ///
    /// # Examples
    ///
    /// ```
    /// use locum_calc::models::PayFrequency;
    ///
    /// assert_eq!(PayFrequency::BiWeekly.periods_per_year(), 26);
    /// assert_eq!(PayFrequency::SemiMonthly.periods_per_year(), 24);
    /// ```
    pub fn periods_per_year(self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::BiWeekly => 26,
            PayFrequency::SemiMonthly => 24,
            PayFrequency::Monthly => 12,
            PayFrequency::Quarterly => 4,
            PayFrequency::Annually => 1,
        }
    }

    /// Returns how many pay periods of the year have been paid once a
    /// paycheck dated `pay_date` is issued (this period included).
    ///
    /// Weekly and bi-weekly schedules are counted from January 1st.
    ///
    /// # Examples
    ///
    /// ```
    /// use locum_calc::models::PayFrequency;
    /// use chrono::NaiveDate;
    ///
    /// let date = NaiveDate::from_ymd_opt(2025, 3, 20).unwrap();
    /// assert_eq!(PayFrequency::Monthly.periods_elapsed(date), 3);
    /// assert_eq!(PayFrequency::SemiMonthly.periods_elapsed(date), 6);
    /// assert_eq!(PayFrequency::Quarterly.periods_elapsed(date), 1);
    /// ```
    pub fn periods_elapsed(self, pay_date: NaiveDate) -> u32 {
        let day_of_year = pay_date.ordinal0();
        let month0 = pay_date.month0();
        let elapsed = match self {
            PayFrequency::Weekly => day_of_year / 7 + 1,
            PayFrequency::BiWeekly => day_of_year / 14 + 1,
            PayFrequency::SemiMonthly => month0 * 2 + if pay_date.day() > 15 { 2 } else { 1 },
            PayFrequency::Monthly => month0 + 1,
            PayFrequency::Quarterly => month0 / 3 + 1,
            PayFrequency::Annually => 1,
        };
        elapsed.min(self.periods_per_year())
    }
}

/// Tax liabilities for one calculation, by category.
///
/// Every amount is in dollars, rounded to cents, for the same period as the
/// gross amount that was taxed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// State whose tables were applied.
    pub jurisdiction: String,
    /// Annualized federal taxable income after deductions and exemptions.
    pub federal_taxable_income: Decimal,
    /// Annualized state taxable income after deductions and exemptions.
    pub state_taxable_income: Decimal,
    /// Federal income tax withholding, including additional withholding.
    pub federal_income_tax: Decimal,
    /// State income tax withholding, including additional withholding.
    pub state_income_tax: Decimal,
    /// Social security (OASDI) tax.
    pub social_security: Decimal,
    /// Medicare tax at the base rate.
    pub medicare: Decimal,
    /// Additional medicare surtax on wages above the threshold.
    pub additional_medicare: Decimal,
    /// State disability / paid leave contribution.
    pub state_disability: Decimal,
    /// Sum of all categories.
    pub total: Decimal,
    /// `total / gross`, zero when gross is zero.
    pub effective_rate: Decimal,
}

impl TaxBreakdown {
    /// Returns the combined FICA amount (social security and all medicare).
    pub fn fica(&self) -> Decimal {
        self.social_security + self.medicare + self.additional_medicare
    }
}
