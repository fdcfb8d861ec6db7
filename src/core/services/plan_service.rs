use chrono::Utc;
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::common::RecordId;
use crate::domain::plan::{HolidayBalance, Plan};
use crate::ledger::Ledger;

/// Operations for plans and the yearly holiday allowance.
pub struct PlanService;

impl PlanService {
    pub fn add(ledger: &mut Ledger, plan: Plan) -> ServiceResult<RecordId> {
        if plan.end_date < plan.start_date {
            return Err(ServiceError::Invalid(
                "plan end date must not precede its start".into(),
            ));
        }
        Ok(ledger.add_plan(plan))
    }

    pub fn update(
        ledger: &mut Ledger,
        id: RecordId,
        mutate: impl FnOnce(&mut Plan),
    ) -> ServiceResult<()> {
        let plan = ledger
            .plan_mut(id)
            .ok_or_else(|| ServiceError::Invalid(format!("plan {id} not found")))?;
        mutate(plan);
        plan.updated_at = Utc::now();
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: RecordId) -> ServiceResult<Plan> {
        ledger
            .remove_plan(id)
            .ok_or_else(|| ServiceError::Invalid(format!("plan {id} not found")))
    }

    pub fn list(ledger: &Ledger) -> &[Plan] {
        &ledger.plans
    }

    pub fn toggle_checklist_item(
        ledger: &mut Ledger,
        plan_id: RecordId,
        item_id: Uuid,
    ) -> ServiceResult<bool> {
        let plan = ledger
            .plan_mut(plan_id)
            .ok_or_else(|| ServiceError::Invalid(format!("plan {plan_id} not found")))?;
        let item = plan
            .checklist
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| {
                ServiceError::Invalid(format!("checklist item {item_id} not found"))
            })?;
        item.completed = !item.completed;
        let completed = item.completed;
        plan.updated_at = Utc::now();
        ledger.touch();
        Ok(completed)
    }

    /// Days reserved by confirmed trips, across all years.
    pub fn planned_trip_days(ledger: &Ledger) -> u32 {
        ledger
            .plans
            .iter()
            .filter(|plan| plan.consumes_holidays())
            .map(|plan| plan.holidays_used)
            .sum()
    }

    /// Recomputes the year's holiday balance from the current plans, creating
    /// the balance with the default allowance when the year is new.
    pub fn refresh_holiday_balance(ledger: &mut Ledger, year: i32) -> ServiceResult<HolidayBalance> {
        let planned = Self::planned_trip_days(ledger);
        if ledger.holiday_balance(year).is_none() {
            ledger.add_holiday_balance(HolidayBalance::new(year));
        }
        let balance = ledger
            .holiday_balance_mut(year)
            .ok_or_else(|| ServiceError::Invalid(format!("holiday balance {year} not found")))?;
        balance.planned_days = planned;
        balance.recompute();
        let snapshot = balance.clone();
        ledger.touch();
        Ok(snapshot)
    }

    /// Adjusts the allowance or consumed days, then refreshes the totals.
    pub fn update_holiday_balance(
        ledger: &mut Ledger,
        year: i32,
        mutate: impl FnOnce(&mut HolidayBalance),
    ) -> ServiceResult<HolidayBalance> {
        if ledger.holiday_balance(year).is_none() {
            ledger.add_holiday_balance(HolidayBalance::new(year));
        }
        let balance = ledger
            .holiday_balance_mut(year)
            .ok_or_else(|| ServiceError::Invalid(format!("holiday balance {year} not found")))?;
        mutate(balance);
        balance.year = year;
        Self::refresh_holiday_balance(ledger, year)
    }
}
