use actiongraph::records::{JsonDump, Row};
use clap::Parser;
use rand::{Rng, rngs::ThreadRng};
use std::fs;

/// A CLI tool to generate synthetic ResWare table dumps for actiongraph
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON dump to
    #[arg(short, long, default_value = "generated_records.json")]
    output: String,

    /// The number of groups on the generated action list
    #[arg(long, default_value_t = 8)]
    groups: usize,

    /// The maximum number of actions per group
    #[arg(long, default_value_t = 12)]
    max_actions: usize,

    /// The maximum number of affects per action
    #[arg(long, default_value_t = 3)]
    max_affects: usize,

    /// Probability that an affect targets an action that does not exist
    #[arg(long, default_value_t = 0.05)]
    dangling: f64,

    /// The ActionListDefID of the generated action list
    #[arg(long, default_value_t = 1)]
    action_list: i64,
}

/// Ids handed out so far, so affects can point at real (or deliberately missing) actions.
struct Generated {
    group_ids: Vec<i64>,
    actions: Vec<(i64, i64)>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if cli.groups == 0 || cli.max_actions == 0 {
        eprintln!("Error: --groups and --max-actions must be at least 1");
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.dangling) {
        eprintln!("Error: --dangling ({}) must be between 0 and 1", cli.dangling);
        std::process::exit(1);
    }

    println!(
        "Generating action list {} ({} groups, up to {} actions each)...",
        cli.action_list, cli.groups, cli.max_actions
    );

    let mut dump = JsonDump::default();
    let generated = generate_groups(&mut dump, &mut rng, &cli);
    generate_affects(&mut dump, &mut rng, &cli, &generated);
    generate_triggers(&mut dump, &mut rng, &generated);

    let json_output = serde_json::to_string_pretty(&dump)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated {} actions and saved the dump to '{}'",
        generated.actions.len(),
        cli.output
    );
    Ok(())
}

/// Generates the action list, its groups, and the actions placed in them.
fn generate_groups(dump: &mut JsonDump, rng: &mut ThreadRng, cli: &Cli) -> Generated {
    let mut generated = Generated {
        group_ids: Vec::new(),
        actions: Vec::new(),
    };
    let mut memberships = Vec::new();
    let mut groups = Vec::new();
    let mut definitions = Vec::new();
    let mut group_actions = Vec::new();

    let lists = vec![
        Row::new()
            .with("ActionListDefID", cli.action_list)
            .with("Name", format!("Generated List {}", cli.action_list)),
    ];

    let mut next_action_id = 1000;
    for index in 0..cli.groups {
        let group_id = 100 + index as i64;
        generated.group_ids.push(group_id);
        groups.push(
            Row::new()
                .with("ActionListGroupDefID", group_id)
                .with("ActionListGroupName", format!("Group {}", index + 1)),
        );
        memberships.push(
            Row::new()
                .with("ActionListDefId", cli.action_list)
                .with("ActionListGroupDefId", group_id)
                .with("GroupOrder", index as i64)
                .with("Optional", rng.random_bool(0.25)),
        );

        let count = rng.random_range(1..=cli.max_actions);
        for order in 0..count {
            let action_id = next_action_id;
            next_action_id += 1;
            generated.actions.push((group_id, action_id));
            definitions.push(
                Row::new()
                    .with("ActionDefID", action_id)
                    .with("Name", format!("TX: Step {}", action_id))
                    .with("DisplayName", format!("Step {}", action_id))
                    .with("Description", serde_json::Value::Null)
                    .with("Hidden", rng.random_bool(0.1)),
            );
            group_actions.push(
                Row::new()
                    .with("ActionListGroupDefID", group_id)
                    .with("ActionDefID", action_id)
                    .with("ActionOrder", order as i64)
                    .with("Dynamic", rng.random_bool(0.2)),
            );
        }
    }

    dump.insert("ActionListDef", lists);
    dump.insert("ActionListGroupsDef", memberships);
    dump.insert("ActionListGroupDef", groups);
    dump.insert("ActionDef", definitions);
    dump.insert("ActionListGroupActionDef", group_actions);
    println!("-> Generated {} groups.", generated.group_ids.len());
    generated
}

/// Generates offset, mark-done and create affects, including cycles and dangling targets.
fn generate_affects(dump: &mut JsonDump, rng: &mut ThreadRng, cli: &Cli, generated: &Generated) {
    let mut rows = Vec::new();
    for &(group_id, action_id) in &generated.actions {
        let count = rng.random_range(0..=cli.max_affects);
        for order in 0..count {
            let (target_group, target_action) = pick_target(rng, cli, generated);
            let row = Row::new()
                .with("ActionListGroupDefID", group_id)
                .with("ActionDefID", action_id)
                .with("ActionTypeID", rng.random_range(1..=2))
                .with("AffectOrder", order as i64);

            let row = match rng.random_range(0..4) {
                0 => row
                    .with("AffectActionListGroupDefID", target_group)
                    .with("AffectActionDefID", target_action)
                    .with("AffectActionTypeID", rng.random_range(1..=2))
                    .with("AffectOffset", (rng.random_range(-72..=72) as f64) / 2.0),
                1 => row
                    .with("AffectActionListGroupDefID", target_group)
                    .with("AffectActionDefID", target_action)
                    .with("AffectActionTypeID", rng.random_range(1..=2))
                    .with("AffectAutoComplete", true),
                2 => row
                    .with("CreateActionActionListGroupDefID", target_group)
                    .with("CreateActionActionDefID", target_action),
                _ => {
                    let index = rng.random_range(0..generated.group_ids.len());
                    row.with("CreateGroupActionListGroupDefID", generated.group_ids[index])
                }
            };
            rows.push(row);
        }
    }
    println!("-> Generated {} affect rows.", rows.len());
    dump.insert("ActionGroupAffectDef", rows);
}

/// Generates the well-known root external actions and a "File Created" trigger per group.
fn generate_triggers(dump: &mut JsonDump, rng: &mut ThreadRng, generated: &Generated) {
    let external_actions = actiongraph::graph::ROOT_EXTERNAL_ACTIONS
        .iter()
        .map(|(id, name)| Row::new().with("ExternalActionDefID", *id).with("Name", *name))
        .collect();
    dump.insert("ExternalActionDef", external_actions);

    let mut rows = Vec::new();
    for &group_id in &generated.group_ids {
        let in_group: Vec<_> = generated
            .actions
            .iter()
            .filter(|(g, _)| *g == group_id)
            .collect();
        if in_group.is_empty() || !rng.random_bool(0.5) {
            continue;
        }
        let (target_group, target_action) = in_group[rng.random_range(0..in_group.len())];
        rows.push(
            Row::new()
                .with("ActionListGroupDefID", group_id)
                .with("ExternalActionDefID", 14)
                .with("CreateActionActionListGroupDefID", *target_group)
                .with("CreateActionActionDefID", *target_action),
        );
    }
    println!("-> Generated {} trigger rows.", rows.len());
    dump.insert("ActionListGroupExternalTriggerAffectsDef", rows);
}

/// Picks an existing action, or an id past the last one to leave a dangling reference.
fn pick_target(rng: &mut ThreadRng, cli: &Cli, generated: &Generated) -> (i64, i64) {
    if rng.random_bool(cli.dangling) {
        let group_index = rng.random_range(0..generated.group_ids.len());
        return (generated.group_ids[group_index], 999_999);
    }
    generated.actions[rng.random_range(0..generated.actions.len())]
}
