//! Questionnaire normalization
//!
//! Turns raw, loosely-typed questionnaire data into the fully-populated
//! [`NormalizedAnalysisRequest`] sent to the analysis collaborator. The
//! transformation never fails and never branches on section absence: a
//! missing section simply reads as all defaults.
//!
//! Integer coercion applies to amounts and counts; float coercion applies to
//! rate-like fields (mortgage rate, loan rates, card APRs, tax brackets,
//! match percentages, growth rates).
//!
//! The normalizer does not classify. The plan scope of the request is left
//! empty here and attached by the caller with
//! [`NormalizedAnalysisRequest::scoped_to`].

pub mod coerce;
pub mod request;

use chrono::NaiveDate;
use serde_json::Value;

use crate::questionnaire::{QuestionnaireData, QuestionnaireSection as S};

pub use coerce::Fields;
pub use request::*;

/// Number of priority recommendations asked of the collaborator
pub const PRIORITY_RECOMMENDATIONS: u32 = 5;

/// Horizon the action plan should cover
pub const IMPLEMENTATION_TIMELINE: &str = "12_months";

/// Advice standard the collaborator must follow
pub const REGULATORY_COMPLIANCE: &str = "fiduciary_standard";

/// Currency of every amount in the request
pub const CURRENCY: &str = "USD";

/// Build the analysis request for a questionnaire as of `today`
pub fn normalize(data: &QuestionnaireData, today: NaiveDate) -> NormalizedAnalysisRequest {
    let fields = move |section: S| Fields::new(data.section(section));

    NormalizedAnalysisRequest {
        client_profile: client_profile(fields(S::Personal)),
        income: income(fields(S::Income)),
        expenses: expenses(fields(S::Expenses)),
        assets: assets(fields(S::Assets)),
        liabilities: liabilities(fields(S::Liabilities)),
        goals: goals(fields(S::Goals)),
        risk: risk_profile(fields(S::Risk), fields(S::Preferences)),
        extended_profile: ExtendedProfile {
            employer_benefits: employer_benefits(fields(S::EmployerBenefits)),
            insurance: insurance(fields(S::Insurance)),
            tax_situation: tax_situation(fields(S::TaxSituation)),
            estate_planning: estate_planning(fields(S::EstatePlanning)),
            behavioral: behavioral(fields(S::Behavioral)),
            cash_flow: cash_flow(fields(S::CashFlow)),
            life_career: life_career(fields(S::LifeCareer)),
            investment_philosophy: investment_philosophy(fields(S::InvestmentPhilosophy)),
        },
        market_context: MarketContext {
            analysis_date: today.format("%Y-%m-%d").to_string(),
            currency: CURRENCY.to_string(),
        },
        analysis_requirements: AnalysisRequirements {
            priority_recommendations: PRIORITY_RECOMMENDATIONS,
            implementation_timeline: IMPLEMENTATION_TIMELINE.to_string(),
            regulatory_compliance: REGULATORY_COMPLIANCE.to_string(),
            ..AnalysisRequirements::default()
        },
    }
}

fn sum(values: impl IntoIterator<Item = i64>) -> i64 {
    values.into_iter().fold(0i64, i64::saturating_add)
}

fn client_profile(f: Fields<'_>) -> ClientProfile {
    ClientProfile {
        name: f.string("name"),
        age: f.int("age"),
        marital_status: f.string("maritalStatus"),
        dependents: f.int("dependents"),
        dependent_ages: f.ages("dependentAges"),
        occupation: f.string("occupation"),
        employment_status: f.string("employmentStatus"),
        state: f.string("state"),
        retirement_age: f.int("retirementAge"),
    }
}

fn income(f: Fields<'_>) -> Income {
    let mut income = Income {
        annual_salary: f.int("salary"),
        bonus: f.int("bonus"),
        spouse_income: f.int("spouseIncome"),
        rental_income: f.int("rentalIncome"),
        investment_income: f.int("investmentIncome"),
        other_income: f.int("otherIncome"),
        total_annual_income: 0,
    };
    income.total_annual_income = sum([
        income.annual_salary,
        income.bonus,
        income.spouse_income,
        income.rental_income,
        income.investment_income,
        income.other_income,
    ]);
    income
}

fn expenses(f: Fields<'_>) -> Expenses {
    let mut expenses = Expenses {
        housing: f.int("housing"),
        utilities: f.int("utilities"),
        food: f.int("food"),
        transportation: f.int("transportation"),
        insurance: f.int("insurance"),
        healthcare: f.int("healthcare"),
        childcare: f.int("childcare"),
        entertainment: f.int("entertainment"),
        other: f.int("other"),
        total_monthly_expenses: 0,
    };
    expenses.total_monthly_expenses = sum([
        expenses.housing,
        expenses.utilities,
        expenses.food,
        expenses.transportation,
        expenses.insurance,
        expenses.healthcare,
        expenses.childcare,
        expenses.entertainment,
        expenses.other,
    ]);
    expenses
}

fn assets(f: Fields<'_>) -> Assets {
    let mut assets = Assets {
        checking: f.int("checking"),
        savings: f.int("savings"),
        emergency_fund: f.int("emergencyFund"),
        retirement_401k: f.int("retirement401k"),
        ira: f.int("ira"),
        roth_ira: f.int("rothIra"),
        brokerage: f.int("brokerage"),
        real_estate: f.int("realEstate"),
        other_assets: f.int("otherAssets"),
        total_assets: 0,
    };
    assets.total_assets = sum([
        assets.checking,
        assets.savings,
        assets.emergency_fund,
        assets.retirement_401k,
        assets.ira,
        assets.roth_ira,
        assets.brokerage,
        assets.real_estate,
        assets.other_assets,
    ]);
    assets
}

fn loan(raw: &Value) -> Loan {
    let f = Fields::of_value(raw);
    Loan {
        name: f.string("name"),
        balance: f.int("balance"),
        rate: f.float("rate"),
        payment: f.int("payment"),
    }
}

fn credit_card(raw: &Value) -> CreditCard {
    let f = Fields::of_value(raw);
    CreditCard {
        name: f.string("name"),
        balance: f.int("balance"),
        limit: f.int("limit"),
        rate: f.float("rate"),
    }
}

fn liabilities(f: Fields<'_>) -> Liabilities {
    let mut liabilities = Liabilities {
        mortgage_balance: f.int("mortgageBalance"),
        mortgage_rate: f.float("mortgageRate"),
        mortgage_payment: f.int("mortgagePayment"),
        auto_loans: f.list("autoLoans").iter().map(loan).collect(),
        credit_cards: f.list("creditCards").iter().map(credit_card).collect(),
        student_loans: f.list("studentLoans").iter().map(loan).collect(),
        other_debt: f.int("otherDebt"),
        total_liabilities: 0,
    };
    liabilities.total_liabilities = sum(
        [liabilities.mortgage_balance, liabilities.other_debt]
            .into_iter()
            .chain(liabilities.auto_loans.iter().map(|l| l.balance))
            .chain(liabilities.student_loans.iter().map(|l| l.balance))
            .chain(liabilities.credit_cards.iter().map(|c| c.balance)),
    );
    liabilities
}

fn goals(f: Fields<'_>) -> Goals {
    Goals {
        primary_goal: f.string("primaryGoal"),
        retirement_savings_goal: f.int("retirementSavingsGoal"),
        emergency_fund_months: f.int("emergencyFundMonths"),
        home_purchase_amount: f.int("homePurchaseAmount"),
        home_purchase_timeline_years: f.int("homePurchaseYears"),
        education_funding: f.int("educationFunding"),
        other_goals: f.string("otherGoals"),
    }
}

fn risk_profile(risk: Fields<'_>, preferences: Fields<'_>) -> RiskProfile {
    RiskProfile {
        tolerance: risk.string("tolerance"),
        investment_experience: risk.string("experience"),
        time_horizon: risk.string("timeHorizon"),
        loss_reaction: risk.string("lossReaction"),
        investment_style: preferences.string("investmentStyle"),
        esg_preference: preferences.string("esgInvesting"),
    }
}

fn employer_benefits(f: Fields<'_>) -> EmployerBenefits {
    EmployerBenefits {
        retirement_plan: f.string("retirementPlan"),
        employer_match_percent: f.float("matchPercent"),
        hsa_eligible: f.string("hsaEligible"),
        stock_options: f.string("stockOptions"),
    }
}

fn insurance(f: Fields<'_>) -> InsuranceCoverage {
    InsuranceCoverage {
        life_coverage: f.int("lifeInsurance"),
        disability_coverage: f.string("disabilityInsurance"),
        health_plan: f.string("healthInsurance"),
        umbrella_coverage: f.int("umbrellaCoverage"),
        long_term_care: f.string("longTermCare"),
    }
}

fn tax_situation(f: Fields<'_>) -> TaxSituation {
    TaxSituation {
        filing_status: f.string("filingStatus"),
        federal_bracket: f.float("taxBracket"),
        state_tax_rate: f.float("stateTaxRate"),
        itemizes_deductions: f.string("itemizeDeductions"),
    }
}

fn estate_planning(f: Fields<'_>) -> EstatePlanning {
    EstatePlanning {
        has_will: f.string("hasWill"),
        has_trust: f.string("hasTrust"),
        beneficiaries_updated: f.string("beneficiariesUpdated"),
        power_of_attorney: f.string("powerOfAttorney"),
    }
}

fn behavioral(f: Fields<'_>) -> Behavioral {
    Behavioral {
        spending_style: f.string("spendingStyle"),
        financial_stress: f.string("financialStress"),
        decision_style: f.string("decisionMaking"),
    }
}

fn cash_flow(f: Fields<'_>) -> CashFlow {
    CashFlow {
        monthly_surplus: f.int("monthlySurplus"),
        irregular_income: f.string("irregularIncome"),
        budgeting_method: f.string("budgetingMethod"),
    }
}

fn life_career(f: Fields<'_>) -> LifeCareer {
    LifeCareer {
        career_stage: f.string("careerStage"),
        expected_income_growth: f.float("incomeGrowth"),
        planned_life_events: f.string("lifeEvents"),
    }
}

fn investment_philosophy(f: Fields<'_>) -> InvestmentPhilosophy {
    InvestmentPhilosophy {
        approach: f.string("approach"),
        rebalancing_frequency: f.string("rebalancingFrequency"),
        active_vs_passive: f.string("activeVsPassive"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan_tier::{PlanType, ReportSection};
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    /// Walk a JSON tree asserting every number is zero and every string empty
    fn assert_all_default(value: &Value, path: &str) {
        match value {
            Value::Number(n) => assert_eq!(n.as_f64(), Some(0.0), "{} should be 0", path),
            Value::String(s) => assert!(s.is_empty(), "{} should be empty, got {:?}", path, s),
            Value::Array(items) => assert!(items.is_empty(), "{} should be empty", path),
            Value::Object(map) => {
                for (key, child) in map {
                    assert_all_default(child, &format!("{}.{}", path, key));
                }
            }
            other => panic!("unexpected value at {}: {:?}", path, other),
        }
    }

    #[test]
    fn test_empty_questionnaire_produces_all_defaults() {
        let request = normalize(&QuestionnaireData::new(), date());
        let json = serde_json::to_value(&request).unwrap();

        for (block, value) in json.as_object().unwrap() {
            if block == "market_context" || block == "analysis_requirements" {
                continue;
            }
            assert_all_default(value, block);
        }

        assert_eq!(request.market_context.analysis_date, "2024-03-09");
        assert_eq!(request.analysis_requirements.plan_type, PlanType::Quick);
    }

    #[test]
    fn test_contract_constants_are_emitted() {
        let request = normalize(&QuestionnaireData::new(), date());
        let requirements = &request.analysis_requirements;

        assert_eq!(requirements.priority_recommendations, PRIORITY_RECOMMENDATIONS);
        assert_eq!(requirements.implementation_timeline, IMPLEMENTATION_TIMELINE);
        assert_eq!(requirements.regulatory_compliance, REGULATORY_COMPLIANCE);
        assert_eq!(request.market_context.currency, CURRENCY);
    }

    #[test]
    fn test_credit_card_coercion() {
        let data = QuestionnaireData::from_value(json!({
            "liabilities": {
                "creditCards": [
                    {"name": "Visa", "balance": "1500", "limit": "5000", "rate": "19.99"}
                ]
            }
        }));

        let request = normalize(&data, date());
        assert_eq!(
            request.liabilities.credit_cards,
            vec![CreditCard {
                name: "Visa".to_string(),
                balance: 1500,
                limit: 5000,
                rate: 19.99,
            }]
        );

        let json = serde_json::to_value(&request.liabilities.credit_cards).unwrap();
        assert_eq!(
            json,
            json!([{"name": "Visa", "balance": 1500, "limit": 5000, "rate": 19.99}])
        );
    }

    #[test]
    fn test_loan_lists_preserve_order_and_cardinality() {
        let data = QuestionnaireData::from_value(json!({
            "liabilities": {
                "autoLoans": [
                    {"name": "Truck", "balance": "18000", "rate": "6.9", "payment": "450"},
                    "garbage",
                    {"name": "Sedan", "balance": 9000.4, "rate": 3, "payment": "bad"}
                ],
                "studentLoans": "none"
            }
        }));

        let liabilities = normalize(&data, date()).liabilities;
        assert_eq!(liabilities.auto_loans.len(), 3);
        assert_eq!(liabilities.auto_loans[0].name, "Truck");
        assert_eq!(liabilities.auto_loans[0].rate, 6.9);
        assert_eq!(liabilities.auto_loans[1], Loan::default());
        assert_eq!(liabilities.auto_loans[2].balance, 9000);
        assert_eq!(liabilities.auto_loans[2].rate, 3.0);
        assert_eq!(liabilities.auto_loans[2].payment, 0);
        assert!(liabilities.student_loans.is_empty());
        assert!(liabilities.credit_cards.is_empty());
    }

    #[test]
    fn test_rate_fields_keep_fractions() {
        let data = QuestionnaireData::from_value(json!({
            "liabilities": {"mortgageBalance": "250000.50", "mortgageRate": "6.125"},
            "taxSituation": {"taxBracket": "22.5"},
        }));

        let request = normalize(&data, date());
        assert_eq!(request.liabilities.mortgage_balance, 250000);
        assert_eq!(request.liabilities.mortgage_rate, 6.125);
        assert_eq!(request.extended_profile.tax_situation.federal_bracket, 22.5);
    }

    #[test]
    fn test_dependent_ages() {
        let data = QuestionnaireData::from_value(json!({
            "personal": {"dependents": "3", "dependentAges": "34, 7, abc, 10"}
        }));

        let profile = normalize(&data, date()).client_profile;
        assert_eq!(profile.dependents, 3);
        assert_eq!(profile.dependent_ages, vec![34, 7, 10]);
    }

    #[test]
    fn test_derived_totals() {
        let data = QuestionnaireData::from_value(json!({
            "income": {"salary": "85000", "bonus": "5000", "otherIncome": "n/a"},
            "expenses": {"housing": "2000", "food": "600", "utilities": 150},
            "assets": {"checking": "3000", "savings": "12000", "retirement401k": "45000"},
            "liabilities": {
                "mortgageBalance": "200000",
                "otherDebt": "1000",
                "creditCards": [{"balance": "1500"}, {"balance": "500"}],
                "autoLoans": [{"balance": "8000"}],
                "studentLoans": [{"balance": "20000"}]
            }
        }));

        let request = normalize(&data, date());
        assert_eq!(request.income.total_annual_income, 90000);
        assert_eq!(request.expenses.total_monthly_expenses, 2750);
        assert_eq!(request.assets.total_assets, 60000);
        assert_eq!(request.liabilities.total_liabilities, 231000);
    }

    #[test]
    fn test_preferences_merge_into_risk_profile() {
        let data = QuestionnaireData::from_value(json!({
            "risk": {"tolerance": "moderate", "timeHorizon": "10+ years"},
            "preferences": {"investmentStyle": "index", "esgInvesting": true}
        }));

        let risk = normalize(&data, date()).risk;
        assert_eq!(risk.tolerance, "moderate");
        assert_eq!(risk.time_horizon, "10+ years");
        assert_eq!(risk.investment_style, "index");
        assert_eq!(risk.esg_preference, "true");
        assert_eq!(risk.loss_reaction, "");
    }

    #[test]
    fn test_plan_scope_left_to_caller() {
        let full = S::ALL.iter().fold(QuestionnaireData::new(), |d, s| {
            d.with_section(*s, json!({"x": "1"}))
        });

        // Completing every section does not change the scope by itself
        let request = normalize(&full, date());
        assert_eq!(request.analysis_requirements.plan_type, PlanType::Quick);
        assert!(request.analysis_requirements.sections_requested.is_empty());

        let scoped = request.clone().scoped_to(
            PlanType::Comprehensive,
            vec![ReportSection::Executive, ReportSection::Tax],
        );
        assert_eq!(scoped.analysis_requirements.plan_type, PlanType::Comprehensive);
        assert_eq!(
            scoped.analysis_requirements.sections_requested,
            vec![ReportSection::Executive, ReportSection::Tax]
        );
        assert_eq!(scoped.client_profile, request.client_profile);
        assert_eq!(scoped.analysis_requirements.priority_recommendations, PRIORITY_RECOMMENDATIONS);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let data = QuestionnaireData::from_value(json!({
            "personal": {"name": "Ada", "age": "41"},
            "liabilities": {"creditCards": [{"name": "Visa", "rate": "19.99"}]}
        }));

        let first = serde_json::to_string(&normalize(&data, date())).unwrap();
        let second = serde_json::to_string(&normalize(&data, date())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_wrong_section_shapes_read_as_defaults() {
        let data = QuestionnaireData::from_value(json!({
            "income": "lots",
            "assets": [1, 2],
            "liabilities": null
        }));

        let request = normalize(&data, date());
        assert_eq!(request.income, Income::default());
        assert_eq!(request.assets, Assets::default());
        assert_eq!(request.liabilities, Liabilities::default());
    }
}
