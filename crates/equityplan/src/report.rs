//! Plain-text rendering of engine output

use std::fmt::{self, Write};

use equityplan_core::evaluate::{ClientReport, GrantReport};
use equityplan_core::model::{
    Client, DispositionQualification, EsppQualification, Grant, IsoDisposition,
    QuarterlyBreakdown, VestingEvent,
};
use equityplan_core::optimization::{ExercisePlan, PlanOutcome};

use crate::util::format::{format_currency, format_currency_short, format_percentage, format_shares};

/// One line per stored client, marking the active one
pub fn write_client_list(
    out: &mut impl Write,
    clients: &[String],
    active: Option<&str>,
) -> fmt::Result {
    if clients.is_empty() {
        return writeln!(out, "No clients. Run `equityplan init` to create a sample.");
    }
    for id in clients {
        let marker = if Some(id.as_str()) == active { "*" } else { " " };
        writeln!(out, "{marker} {id}")?;
    }
    Ok(())
}

pub fn write_client_report(out: &mut impl Write, client: &Client, report: &ClientReport) -> fmt::Result {
    let name = if client.name.is_empty() {
        client.id.as_str()
    } else {
        client.name.as_str()
    };
    writeln!(out, "{name} ({})", client.id)?;
    writeln!(
        out,
        "{}, {}, {}% bracket, as of {}",
        client.state,
        client.filing_status.label(),
        client.tax_bracket,
        report.as_of
    )?;
    writeln!(out)?;

    let rates = &report.rates;
    writeln!(out, "Rates")?;
    writeln!(out, "  Ordinary:      {}", format_percentage(rates.ordinary_rate))?;
    writeln!(out, "  Vest income:   {}", format_percentage(rates.effective_vest_rate()))?;
    writeln!(out, "  Long-term CG:  {}", format_percentage(rates.ltcg_rate))?;
    writeln!(out, "  State:         {}", format_percentage(rates.state_rate))?;
    writeln!(out, "  AMT room:      {}", format_currency_short(report.amt_room))?;
    writeln!(out)?;

    writeln!(out, "Grants")?;
    writeln!(
        out,
        "  {:<20} {:<5} {:<6} {:>9} {:>9} {:>9} {:>9} {:>14}",
        "ID", "Type", "Ticker", "Total", "Vested", "Unvested", "Available", "Market value"
    )?;
    for (grant, grant_report) in client.grants.iter().zip(&report.grants) {
        writeln!(
            out,
            "  {:<20} {:<5} {:<6} {:>9} {:>9} {:>9} {:>9} {:>14}{}",
            grant.id.as_str(),
            grant.grant_type.label(),
            grant.ticker,
            format_shares(grant.total_shares),
            format_shares(grant_report.status.vested_total),
            format_shares(grant_report.status.unvested),
            format_shares(grant_report.status.available),
            format_currency_short(grant_report.holdings.market_value),
            if grant_report.holdings.uses_override { " (manual)" } else { "" },
        )?;
    }
    writeln!(out)?;

    let totals = &report.totals;
    writeln!(out, "Portfolio")?;
    writeln!(out, "  Market value:    {}", format_currency(totals.market_value))?;
    writeln!(out, "  Vested value:    {}", format_currency(totals.vested_value))?;
    writeln!(out, "  Unvested value:  {}", format_currency(totals.unvested_value))?;
    writeln!(
        out,
        "  Tax gap ({}):  {}",
        report.as_of.year(),
        format_currency(totals.tax_gap)
    )?;

    for (grant, grant_report) in client.grants.iter().zip(&report.grants) {
        write_grant_details(out, grant, grant_report)?;
    }

    writeln!(out)?;
    write_quarterly(out, report.as_of.year(), &report.quarterly)
}

/// Full reports for several clients, in order, separated by a rule
pub fn write_client_reports(
    out: &mut impl Write,
    clients: &[Client],
    reports: &[ClientReport],
) -> fmt::Result {
    if clients.is_empty() {
        return write_client_list(out, &[], None);
    }
    for (i, (client, report)) in clients.iter().zip(reports).enumerate() {
        if i > 0 {
            writeln!(out)?;
            writeln!(out, "{}", "=".repeat(72))?;
            writeln!(out)?;
        }
        write_client_report(out, client, report)?;
    }
    Ok(())
}

fn write_grant_details(out: &mut impl Write, grant: &Grant, report: &GrantReport) -> fmt::Result {
    match &report.disposition {
        Some(DispositionQualification::Espp(q)) => {
            writeln!(out)?;
            writeln!(out, "ESPP {} ({})", grant.id, grant.ticker)?;
            write_espp(out, q)?;
        }
        Some(DispositionQualification::Iso { exercises }) if !exercises.is_empty() => {
            writeln!(out)?;
            writeln!(out, "ISO dispositions {} ({})", grant.id, grant.ticker)?;
            for d in exercises {
                write_iso_disposition(out, d)?;
            }
        }
        _ => {}
    }

    if let Some(plan) = &report.exercise_plan {
        writeln!(out)?;
        writeln!(out, "Exercise plan {} ({})", grant.id, grant.ticker)?;
        write_exercise_plan(out, plan)?;
    }
    Ok(())
}

fn write_espp(out: &mut impl Write, q: &EsppQualification) -> fmt::Result {
    writeln!(
        out,
        "  Purchased {} (offering from {}), {} shares",
        q.purchase_date,
        q.offering_start,
        format_shares(q.shares)
    )?;
    if q.is_qualified {
        writeln!(out, "  Qualifying since {}", q.qualifying_date)?;
    } else {
        writeln!(
            out,
            "  Qualifies {} ({} days, {:.0}% of holding period served)",
            q.qualifying_date, q.days_remaining, q.progress_percent
        )?;
    }
    writeln!(
        out,
        "  Sell now: {} tax / qualifying: {} tax / savings {}",
        format_currency_short(q.disqualified.tax),
        format_currency_short(q.qualified.tax),
        format_currency_short(q.tax_savings)
    )
}

fn write_iso_disposition(out: &mut impl Write, d: &IsoDisposition) -> fmt::Result {
    let timing = if d.is_qualified {
        format!("qualifying since {}", d.qualifying_date)
    } else {
        format!("qualifies {} ({} days)", d.qualifying_date, d.days_remaining)
    };
    writeln!(
        out,
        "  {} shares exercised {}: {timing}, AMT preference {}, savings {}",
        format_shares(d.shares),
        d.exercise_date,
        format_currency_short(d.amt_preference),
        format_currency_short(d.tax_savings)
    )
}

pub fn write_exercise_plan(out: &mut impl Write, plan: &ExercisePlan) -> fmt::Result {
    match plan.outcome {
        PlanOutcome::NotApplicable => return writeln!(out, "  Not an ISO grant"),
        PlanOutcome::NoCapacity => {
            return writeln!(out, "  No exercise capacity: no spread or no AMT room");
        }
        PlanOutcome::Complete | PlanOutcome::HorizonExhausted => {}
    }

    writeln!(
        out,
        "  Spread {} per share, up to {} shares per year",
        format_currency(plan.spread_per_share),
        format_shares(plan.max_safe_shares_per_year)
    )?;
    writeln!(
        out,
        "  {:<6} {:>9} {:>12} {:>12} {:>12} {:>10}",
        "Year", "Shares", "Spread", "Cost", "Savings", "Remaining"
    )?;
    for year in &plan.years {
        writeln!(
            out,
            "  {:<6} {:>9} {:>12} {:>12} {:>12} {:>10}",
            year.year,
            format_shares(year.shares),
            format_currency_short(year.spread),
            format_currency_short(year.exercise_cost),
            format_currency_short(year.tax_savings),
            format_shares(year.remaining_after)
        )?;
    }
    writeln!(
        out,
        "  {:<6} {:>9} {:>12} {:>12} {:>12}",
        "Total",
        format_shares(plan.total_shares()),
        "",
        format_currency_short(plan.total_exercise_cost()),
        format_currency_short(plan.total_tax_savings())
    )?;
    if plan.needs_longer_horizon() {
        writeln!(
            out,
            "  {} shares left after {} years; consider a longer horizon",
            format_shares(plan.remaining_shares),
            plan.horizon_years
        )?;
    }
    Ok(())
}

pub fn write_schedule(out: &mut impl Write, grant: &Grant, events: &[VestingEvent]) -> fmt::Result {
    writeln!(
        out,
        "{} {} ({}), {} shares, {}",
        grant.grant_type,
        grant.id,
        grant.ticker,
        format_shares(grant.total_shares),
        grant.vesting_schedule.label()
    )?;
    if events.is_empty() {
        return writeln!(out, "  No vesting dates");
    }

    writeln!(
        out,
        "  {:<11} {:>8} {:>10} {:>12} {:>11} {:>8} {:>10}  ",
        "Date", "Shares", "Price", "Gross", "Withheld", "Net", "Tax gap"
    )?;
    for e in events {
        writeln!(
            out,
            "  {:<11} {:>8} {:>10} {:>12} {:>11} {:>8} {:>10}  {}",
            e.date.to_string(),
            format_shares(e.shares),
            format_currency(e.price_at_vest),
            format_currency_short(e.gross_value),
            format_currency_short(e.withholding_amount),
            format_shares(e.net_shares),
            format_currency_short(e.tax_gap),
            if e.is_past { "vested" } else { "" }
        )?;
    }
    Ok(())
}

pub fn write_quarterly(out: &mut impl Write, year: i16, quarters: &[QuarterlyBreakdown; 4]) -> fmt::Result {
    writeln!(out, "Estimated payments {year}")?;
    writeln!(
        out,
        "  {:<3} {:<19} {:>12} {:>11} {:>12} {:>12} {:>11}",
        "Q", "Due", "Vest income", "Withheld", "ISO spread", "Est. tax", "Payment"
    )?;
    for q in quarters {
        writeln!(
            out,
            "  {:<3} {:<19} {:>12} {:>11} {:>12} {:>12} {:>11}{}",
            format!("Q{}", q.quarter),
            q.due_label,
            format_currency_short(q.vesting_income),
            format_currency_short(q.withholding_credit),
            format_currency_short(q.iso_spread),
            format_currency_short(q.estimated_tax),
            format_currency_short(q.payment_due),
            if q.is_past { "  (past)" } else { "" }
        )?;
    }
    let total: f64 = quarters.iter().map(|q| q.payment_due).sum();
    writeln!(out, "  Total due: {}", format_currency(total))
}
