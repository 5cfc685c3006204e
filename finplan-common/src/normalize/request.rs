//! Normalized analysis request document
//!
//! Every field is present and typed. Amounts are whole currency units
//! (`i64`); rate-like fields keep fractional percentages (`f64`).

use serde::{Deserialize, Serialize};

use crate::plan_tier::{PlanType, ReportSection};

/// Document handed to the analysis collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnalysisRequest {
    pub client_profile: ClientProfile,
    pub income: Income,
    pub expenses: Expenses,
    pub assets: Assets,
    pub liabilities: Liabilities,
    pub goals: Goals,
    pub risk: RiskProfile,
    pub extended_profile: ExtendedProfile,
    pub market_context: MarketContext,
    pub analysis_requirements: AnalysisRequirements,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    pub age: i64,
    pub marital_status: String,
    pub dependents: i64,
    pub dependent_ages: Vec<i64>,
    pub occupation: String,
    pub employment_status: String,
    pub state: String,
    pub retirement_age: i64,
}

/// Annual income
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    pub annual_salary: i64,
    pub bonus: i64,
    pub spouse_income: i64,
    pub rental_income: i64,
    pub investment_income: i64,
    pub other_income: i64,
    pub total_annual_income: i64,
}

/// Monthly expenses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expenses {
    pub housing: i64,
    pub utilities: i64,
    pub food: i64,
    pub transportation: i64,
    pub insurance: i64,
    pub healthcare: i64,
    pub childcare: i64,
    pub entertainment: i64,
    pub other: i64,
    pub total_monthly_expenses: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assets {
    pub checking: i64,
    pub savings: i64,
    pub emergency_fund: i64,
    pub retirement_401k: i64,
    pub ira: i64,
    pub roth_ira: i64,
    pub brokerage: i64,
    pub real_estate: i64,
    pub other_assets: i64,
    pub total_assets: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Liabilities {
    pub mortgage_balance: i64,
    pub mortgage_rate: f64,
    pub mortgage_payment: i64,
    pub auto_loans: Vec<Loan>,
    pub credit_cards: Vec<CreditCard>,
    pub student_loans: Vec<Loan>,
    pub other_debt: i64,
    pub total_liabilities: i64,
}

/// Installment loan (auto or student)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub name: String,
    pub balance: i64,
    pub rate: f64,
    pub payment: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub name: String,
    pub balance: i64,
    pub limit: i64,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goals {
    pub primary_goal: String,
    pub retirement_savings_goal: i64,
    pub emergency_fund_months: i64,
    pub home_purchase_amount: i64,
    pub home_purchase_timeline_years: i64,
    pub education_funding: i64,
    pub other_goals: String,
}

/// Risk tolerance and investing preferences
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskProfile {
    pub tolerance: String,
    pub investment_experience: String,
    pub time_horizon: String,
    pub loss_reaction: String,
    pub investment_style: String,
    pub esg_preference: String,
}

/// Answers from the comprehensive-only sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProfile {
    pub employer_benefits: EmployerBenefits,
    pub insurance: InsuranceCoverage,
    pub tax_situation: TaxSituation,
    pub estate_planning: EstatePlanning,
    pub behavioral: Behavioral,
    pub cash_flow: CashFlow,
    pub life_career: LifeCareer,
    pub investment_philosophy: InvestmentPhilosophy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployerBenefits {
    pub retirement_plan: String,
    pub employer_match_percent: f64,
    pub hsa_eligible: String,
    pub stock_options: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceCoverage {
    pub life_coverage: i64,
    pub disability_coverage: String,
    pub health_plan: String,
    pub umbrella_coverage: i64,
    pub long_term_care: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxSituation {
    pub filing_status: String,
    pub federal_bracket: f64,
    pub state_tax_rate: f64,
    pub itemizes_deductions: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstatePlanning {
    pub has_will: String,
    pub has_trust: String,
    pub beneficiaries_updated: String,
    pub power_of_attorney: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Behavioral {
    pub spending_style: String,
    pub financial_stress: String,
    pub decision_style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashFlow {
    pub monthly_surplus: i64,
    pub irregular_income: String,
    pub budgeting_method: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LifeCareer {
    pub career_stage: String,
    pub expected_income_growth: f64,
    pub planned_life_events: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentPhilosophy {
    pub approach: String,
    pub rebalancing_frequency: String,
    pub active_vs_passive: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketContext {
    /// Calendar date of the request, `YYYY-MM-DD`
    pub analysis_date: String,
    pub currency: String,
}

/// Fixed contract terms plus the tier the analysis is scoped to
///
/// An unscoped request reads as quick with no sections requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequirements {
    pub plan_type: PlanType,
    pub sections_requested: Vec<ReportSection>,
    pub priority_recommendations: u32,
    pub implementation_timeline: String,
    pub regulatory_compliance: String,
}

impl Default for AnalysisRequirements {
    fn default() -> Self {
        Self {
            plan_type: PlanType::Quick,
            sections_requested: Vec::new(),
            priority_recommendations: 0,
            implementation_timeline: String::new(),
            regulatory_compliance: String::new(),
        }
    }
}

impl NormalizedAnalysisRequest {
    /// Attach the plan tier and the report sections the analysis should cover
    pub fn scoped_to(mut self, plan_type: PlanType, sections_requested: Vec<ReportSection>) -> Self {
        self.analysis_requirements.plan_type = plan_type;
        self.analysis_requirements.sections_requested = sections_requested;
        self
    }
}
