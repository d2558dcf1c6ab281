//! Access rule handlers: personal view and administration.

use tabled::Tabled;

use unigate_api::types::{AccessRuleFilter, AccessRulePayload};
use unigate_core::controllers::RuleRow;
use unigate_core::{AccessRule, AccessRuleAdminController, MyRulesController, ViewState};

use crate::cli::{GlobalOpts, RuleFields, RuleFilterArgs, RulesArgs, RulesCommand};
use crate::config::SessionContext;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct MyRuleRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Access")]
    access: &'static str,
    #[tabled(rename = "Schedule")]
    schedule: String,
}

impl From<&RuleRow> for MyRuleRow {
    fn from(r: &RuleRow) -> Self {
        Self {
            id: r.id,
            zone: r.zone.to_string(),
            access: access_label(r.granted),
            schedule: r.schedule.clone(),
        }
    }
}

#[derive(Tabled)]
struct AdminRuleRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "Access")]
    access: &'static str,
    #[tabled(rename = "Schedule")]
    schedule: String,
}

impl From<&AccessRule> for AdminRuleRow {
    fn from(r: &AccessRule) -> Self {
        Self {
            id: r.id,
            role: r.user_role.to_string(),
            zone: r.zone_type.to_string(),
            access: access_label(r.has_access),
            schedule: r.schedule(),
        }
    }
}

fn access_label(granted: bool) -> &'static str {
    if granted { "Granted" } else { "Denied" }
}

// ── Arg conversion ──────────────────────────────────────────────────

impl From<RuleFilterArgs> for AccessRuleFilter {
    fn from(args: RuleFilterArgs) -> Self {
        Self {
            user_role: args.role,
            zone_type: args.zone,
            start_date: args.start_date,
            end_date: args.end_date,
            start_time: args.start_time,
            end_time: args.end_time,
        }
    }
}

impl From<RuleFields> for AccessRulePayload {
    fn from(f: RuleFields) -> Self {
        Self {
            user_role: f.role,
            zone_type: f.zone,
            has_access: !f.deny,
            start_time: f.start_time,
            end_time: f.end_time,
            start_date: f.start_date,
            end_date: f.end_date,
        }
    }
}

fn render_admin_rules(rules: &[AccessRule], global: &GlobalOpts) {
    let out = output::render_list(&global.output, rules, |r| AdminRuleRow::from(r), |r| {
        r.id.to_string()
    });
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    ctx: &SessionContext,
    args: RulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_session(ctx).await?;
    let api = ctx.session.api().clone();

    match args.command {
        RulesCommand::My => {
            let controller = MyRulesController::new(api);
            let rows = util::settle(controller.load().await)?;
            let out = output::render_list(&global.output, &rows, |r| MyRuleRow::from(r), |r| {
                r.id.to_string()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RulesCommand::List(filter) => {
            let controller = AccessRuleAdminController::new(api);
            let rules = util::settle(controller.load(filter.into()).await)?;
            render_admin_rules(&rules, global);
            Ok(())
        }

        RulesCommand::Create(fields) => {
            let controller = AccessRuleAdminController::new(api);
            controller.save(None, &fields.into()).await?;
            output::notice("✓ Rule created", global.quiet);
            Ok(())
        }

        RulesCommand::Update { id, fields } => {
            let controller = AccessRuleAdminController::new(api);
            controller.save(Some(id), &fields.into()).await?;
            output::notice(&format!("✓ Rule {id} updated"), global.quiet);
            if let ViewState::Loaded(rules) = controller.state().rules {
                if let Some(rule) = rules.iter().find(|r| r.id == id) {
                    render_admin_rules(std::slice::from_ref(rule), global);
                }
            }
            Ok(())
        }

        RulesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete access rule {id}?"), global.yes)? {
                return Ok(());
            }
            let controller = AccessRuleAdminController::new(api);
            controller.delete(id).await?;
            output::notice(&format!("✓ Rule {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
