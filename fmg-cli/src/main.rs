mod config;

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;

use fmg_core::differ::{create_plan, find_changed_attributes};
use fmg_core::effect::Effect;
use fmg_core::interpreter::{ApplyResult, EffectOutcome, Interpreter, InterpreterConfig};
use fmg_core::plan::Plan;
use fmg_core::provider::Provider;
use fmg_core::resource::{Resource, ResourceId, State, Value};
use fmg_core::schema::ResourceSchema;
use fmg_provider::{FmgProvider, ProviderConfig, schemas};
use fmg_state::{BackendConfig, LockInfo, StateBackend, StateFile, create_backend};

use config::load_config;

#[derive(Parser)]
#[command(name = "fmg")]
#[command(about = "Manage FortiManager device configuration", long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Validate {
        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,
    },
    /// Show execution plan without applying changes
    Plan {
        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,
    },
    /// Apply changes to reach the desired configuration
    Apply {
        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,
    },
    /// Destroy all managed resources
    Destroy {
        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,

        /// Skip confirmation prompt (auto-approve)
        #[arg(long)]
        auto_approve: bool,
    },
    /// Read every managed resource from the device and update the state
    Refresh {
        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,
    },
    /// Show the recorded state
    Show {
        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,
    },
    /// List supported resource types, or the attributes of one
    Resources {
        /// Resource type to describe (e.g., firewall_policy_move)
        resource_type: Option<String>,
    },
    /// Remove a stale state lock
    ForceUnlock {
        /// Lock ID printed by the failing command
        lock_id: String,

        /// Path to the configuration file
        #[arg(default_value = "fmg.json")]
        file: PathBuf,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate { file } => run_validate(&file),
        Commands::Plan { file } => run_plan(&file).await,
        Commands::Apply { file } => run_apply(&file).await,
        Commands::Destroy { file, auto_approve } => run_destroy(&file, auto_approve).await,
        Commands::Refresh { file } => run_refresh(&file).await,
        Commands::Show { file } => run_show(&file).await,
        Commands::Resources { resource_type } => run_resources(resource_type.as_deref()),
        Commands::ForceUnlock { lock_id, file } => run_force_unlock(&file, &lock_id).await,
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "fmg", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn get_schemas() -> HashMap<String, ResourceSchema> {
    let mut all_schemas = HashMap::new();
    for schema in schemas::all_schemas() {
        all_schemas.insert(schema.resource_type.clone(), schema);
    }
    all_schemas
}

/// Fill in schema defaults, validate and normalize every declared resource
fn prepare_resources(resources: &[Resource]) -> Result<Vec<Resource>, String> {
    let schemas = get_schemas();
    let mut prepared = Vec::with_capacity(resources.len());
    let mut all_errors = Vec::new();

    for resource in resources {
        let Some(schema) = schemas.get(&resource.id.resource_type) else {
            all_errors.push(format!(
                "{}: unknown resource type '{}'",
                resource.id, resource.id.resource_type
            ));
            continue;
        };

        let mut resource = resource.clone();
        schema.apply_defaults(&mut resource.attributes);
        match schema.validate(&resource.attributes) {
            Ok(()) => schema.normalize(&mut resource.attributes),
            Err(errors) => {
                for error in errors {
                    all_errors.push(format!("{}: {}", resource.id, error));
                }
            }
        }
        prepared.push(resource);
    }

    if all_errors.is_empty() {
        Ok(prepared)
    } else {
        Err(all_errors.join("\n"))
    }
}

fn build_provider(config: &ProviderConfig) -> Result<FmgProvider, String> {
    let config = config.clone().with_env().map_err(|e| e.to_string())?;
    FmgProvider::new(&config).map_err(|e| format!("Failed to configure provider: {}", e))
}

fn build_interpreter(config: &ProviderConfig) -> Result<Interpreter<FmgProvider>, String> {
    let provider = build_provider(config)?;
    Ok(Interpreter::new(provider).with_config(InterpreterConfig {
        dry_run: false,
        continue_on_error: true,
    }))
}

async fn open_backend(config: &BackendConfig) -> Result<Box<dyn StateBackend>, String> {
    create_backend(config)
        .await
        .map_err(|e| format!("Failed to open state backend: {}", e))
}

async fn read_state_file(backend: &dyn StateBackend) -> Result<StateFile, String> {
    let state = backend
        .read_state()
        .await
        .map_err(|e| format!("Failed to read state: {}", e))?;
    Ok(state.unwrap_or_default())
}

async fn save_state(backend: &dyn StateBackend, state_file: &mut StateFile) -> Result<(), String> {
    state_file.increment_serial();
    backend
        .write_state(state_file)
        .await
        .map_err(|e| format!("Failed to write state: {}", e))
}

async fn acquire_lock(backend: &dyn StateBackend, operation: &str) -> Result<LockInfo, String> {
    backend
        .acquire_lock(operation)
        .await
        .map_err(|e| format!("Failed to acquire state lock: {}", e))
}

async fn release_lock(backend: &dyn StateBackend, lock: &LockInfo) -> Result<(), String> {
    backend
        .release_lock(lock)
        .await
        .map_err(|e| format!("Failed to release state lock: {}", e))
}

async fn logout(provider: &FmgProvider) {
    if let Err(e) = provider.client().logout().await {
        log::warn!("logout failed: {}", e);
    }
}

/// Read the live state of each resource, using the remote key recorded in state
async fn read_current_states(
    provider: &impl Provider,
    resources: &[Resource],
    state_file: &StateFile,
) -> Result<HashMap<ResourceId, State>, String> {
    let mut current_states = HashMap::new();
    for resource in resources {
        let identifier = state_file.identifier(&resource.id);
        let state = provider
            .read(resource, identifier)
            .await
            .map_err(|e| format!("Failed to read state: {}", e))?;
        current_states.insert(resource.id.clone(), state);
    }
    Ok(current_states)
}

fn run_validate(file: &PathBuf) -> Result<(), String> {
    let config = load_config(file)?;

    println!("{}", "Validating...".cyan());

    prepare_resources(&config.resources)?;

    println!(
        "{}",
        format!(
            "✓ {} resources validated successfully.",
            config.resources.len()
        )
        .green()
        .bold()
    );

    for resource in &config.resources {
        println!("  • {}", resource.id);
    }

    Ok(())
}

async fn run_plan(file: &PathBuf) -> Result<(), String> {
    let config = load_config(file)?;
    let resources = prepare_resources(&config.resources)?;
    let provider = build_provider(&config.provider)?;
    let backend = open_backend(&config.backend).await?;
    let state_file = read_state_file(backend.as_ref()).await?;

    let result = read_current_states(&provider, &resources, &state_file).await;
    logout(&provider).await;
    let current_states = result?;

    let plan = create_plan(&resources, &current_states, &state_file.states());
    print_plan(&plan);
    print_position_warnings(current_states.values());
    Ok(())
}

async fn run_apply(file: &PathBuf) -> Result<(), String> {
    let config = load_config(file)?;
    let resources = prepare_resources(&config.resources)?;
    let interpreter = build_interpreter(&config.provider)?;
    let backend = open_backend(&config.backend).await?;

    let lock = acquire_lock(backend.as_ref(), "apply").await?;
    let result = apply_changes(&interpreter, backend.as_ref(), &resources).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    logout(interpreter.provider()).await;

    result.and(released)
}

async fn apply_changes(
    interpreter: &Interpreter<FmgProvider>,
    backend: &dyn StateBackend,
    resources: &[Resource],
) -> Result<(), String> {
    let provider = interpreter.provider();
    let mut state_file = read_state_file(backend).await?;
    let current_states = read_current_states(provider, resources, &state_file).await?;
    let plan = create_plan(resources, &current_states, &state_file.states());

    // Keep state in step with what was just read, even when nothing changes
    for state in current_states.values() {
        state_file.record(state, provider.name());
    }

    if plan.is_empty() {
        println!("{}", "No changes needed.".green());
        save_state(backend, &mut state_file).await?;
        print_position_warnings(&state_file.states());
        return Ok(());
    }

    print_plan(&plan);
    println!();

    println!("{}", "Applying changes...".cyan().bold());
    println!();

    let result = interpreter.apply(&plan).await;
    record_outcomes(&mut state_file, &plan, &result, provider.name());
    save_state(backend, &mut state_file).await?;

    println!();
    print_position_warnings(&state_file.states());

    if result.is_success() {
        println!(
            "{}",
            format!("Apply complete! {} changes applied.", result.success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Apply failed. {} succeeded, {} failed.",
            result.success_count, result.failure_count
        ))
    }
}

async fn run_destroy(file: &PathBuf, auto_approve: bool) -> Result<(), String> {
    let config = load_config(file)?;
    let resources = prepare_resources(&config.resources)?;
    let interpreter = build_interpreter(&config.provider)?;
    let backend = open_backend(&config.backend).await?;

    let lock = acquire_lock(backend.as_ref(), "destroy").await?;
    let result = destroy_resources(&interpreter, backend.as_ref(), &resources, auto_approve).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    logout(interpreter.provider()).await;

    result.and(released)
}

async fn destroy_resources(
    interpreter: &Interpreter<FmgProvider>,
    backend: &dyn StateBackend,
    resources: &[Resource],
    auto_approve: bool,
) -> Result<(), String> {
    let provider = interpreter.provider();
    let mut state_file = read_state_file(backend).await?;
    let current_states = read_current_states(provider, resources, &state_file).await?;
    let plan = destroy_plan(resources, &current_states, &state_file.states());

    if plan.is_empty() {
        println!("{}", "No resources to destroy.".green());
        return Ok(());
    }

    println!("{}", "Destroy Plan:".red().bold());
    println!();
    for effect in plan.effects() {
        println!("  {} {}", "-".red().bold(), effect.resource_id());
    }
    println!();
    println!(
        "Plan: {} to destroy.",
        plan.mutation_count().to_string().red()
    );
    println!();

    if !auto_approve && !confirm_destroy()? {
        println!();
        println!("{}", "Destroy cancelled.".yellow());
        return Ok(());
    }

    println!("{}", "Destroying resources...".red().bold());
    println!();

    let result = interpreter.apply(&plan).await;
    record_outcomes(&mut state_file, &plan, &result, provider.name());
    save_state(backend, &mut state_file).await?;

    println!();
    if result.is_success() {
        println!(
            "{}",
            format!("Destroy complete! {} resources destroyed.", result.success_count)
                .green()
                .bold()
        );
        Ok(())
    } else {
        Err(format!(
            "Destroy failed. {} succeeded, {} failed.",
            result.success_count, result.failure_count
        ))
    }
}

fn confirm_destroy() -> Result<bool, String> {
    println!(
        "{}",
        "Do you really want to destroy all resources?"
            .yellow()
            .bold()
    );
    println!(
        "  {}",
        "This action cannot be undone. Type 'yes' to confirm.".yellow()
    );
    print!("\n  Enter a value: ");
    io::Write::flush(&mut io::stdout()).map_err(|e| e.to_string())?;

    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| e.to_string())?;
    Ok(input.trim() == "yes")
}

/// Deletes for every resource that exists: resources only known from state
/// first, then declared resources in reverse declaration order.
fn destroy_plan(
    resources: &[Resource],
    current_states: &HashMap<ResourceId, State>,
    tracked: &[State],
) -> Plan {
    let mut plan = Plan::new();
    let declared: HashSet<&ResourceId> = resources.iter().map(|r| &r.id).collect();

    for state in tracked.iter().filter(|s| !declared.contains(&s.id)) {
        plan.add(Effect::Delete {
            id: state.id.clone(),
            from: state.clone(),
        });
    }

    for resource in resources.iter().rev() {
        if let Some(state) = current_states.get(&resource.id)
            && state.exists
        {
            plan.add(Effect::Delete {
                id: resource.id.clone(),
                from: state.clone(),
            });
        }
    }

    plan
}

async fn run_refresh(file: &PathBuf) -> Result<(), String> {
    let config = load_config(file)?;
    let resources = prepare_resources(&config.resources)?;
    let provider = build_provider(&config.provider)?;
    let backend = open_backend(&config.backend).await?;

    let lock = acquire_lock(backend.as_ref(), "refresh").await?;
    let result = refresh_state(&provider, backend.as_ref(), &resources).await;
    let released = release_lock(backend.as_ref(), &lock).await;
    logout(&provider).await;

    result.and(released)
}

async fn refresh_state(
    provider: &FmgProvider,
    backend: &dyn StateBackend,
    resources: &[Resource],
) -> Result<(), String> {
    let mut state_file = read_state_file(backend).await?;

    // Resources dropped from the configuration are still tracked until destroyed
    let declared: HashSet<&ResourceId> = resources.iter().map(|r| &r.id).collect();
    let mut to_read = resources.to_vec();
    to_read.extend(
        state_file
            .states()
            .iter()
            .filter(|s| !declared.contains(&s.id))
            .map(State::to_resource),
    );

    let current_states = read_current_states(provider, &to_read, &state_file).await?;
    let mut missing = 0;
    for resource in &to_read {
        if let Some(state) = current_states.get(&resource.id) {
            if !state.exists && state_file.find(&resource.id).is_some() {
                println!("  {} {} no longer exists", "-".red(), resource.id);
                missing += 1;
            }
            state_file.record(state, provider.name());
        }
    }
    save_state(backend, &mut state_file).await?;

    println!(
        "{}",
        format!(
            "Refresh complete! {} resources tracked, {} gone.",
            state_file.resources.len(),
            missing
        )
        .green()
        .bold()
    );
    print_position_warnings(&state_file.states());
    Ok(())
}

async fn run_show(file: &PathBuf) -> Result<(), String> {
    let config = load_config(file)?;
    let backend = open_backend(&config.backend).await?;
    let state = backend
        .read_state()
        .await
        .map_err(|e| format!("Failed to read state: {}", e))?;

    let Some(state_file) = state else {
        println!("{}", "No state recorded yet.".yellow());
        return Ok(());
    };

    println!(
        "{} serial {}, lineage {}",
        "State:".cyan().bold(),
        state_file.serial,
        state_file.lineage
    );
    println!();

    for state in state_file.states() {
        match &state.identifier {
            Some(identifier) => println!("  {} ({})", state.id.to_string().bold(), identifier),
            None => println!("  {}", state.id.to_string().bold()),
        }
        for (key, value) in sorted_attributes(&state.attributes) {
            println!("      {}: {}", key, format_value(value));
        }
    }

    println!();
    print_position_warnings(&state_file.states());
    Ok(())
}

fn run_resources(resource_type: Option<&str>) -> Result<(), String> {
    let schemas = get_schemas();

    let Some(resource_type) = resource_type else {
        let mut names: Vec<&String> = schemas.keys().collect();
        names.sort();
        println!("{}", "Resource types:".cyan().bold());
        for name in names {
            let description = schemas[name].description.as_deref().unwrap_or("");
            println!("  {:<48} {}", name, description.dimmed());
        }
        return Ok(());
    };

    let schema = schemas
        .get(resource_type)
        .ok_or_else(|| format!("Unknown resource type '{}'", resource_type))?;

    println!("{}", schema.resource_type.cyan().bold());
    if let Some(description) = &schema.description {
        println!("  {}", description);
    }
    println!();

    let mut attributes: Vec<_> = schema.attributes.values().collect();
    attributes.sort_by(|a, b| a.name.cmp(&b.name));
    for attribute in attributes {
        let mut flags = Vec::new();
        if attribute.required {
            flags.push("required".to_string());
        }
        if attribute.computed {
            flags.push("computed".to_string());
        }
        if let Some(default) = &attribute.default {
            flags.push(format!("default {}", format_value(default)));
        }
        println!(
            "  {} ({}){}",
            attribute.name.bold(),
            attribute.attr_type,
            if flags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", flags.join(", "))
            }
        );
        if let Some(description) = &attribute.description {
            println!("      {}", description.dimmed());
        }
    }

    Ok(())
}

async fn run_force_unlock(file: &PathBuf, lock_id: &str) -> Result<(), String> {
    let config = load_config(file)?;
    let backend = open_backend(&config.backend).await?;
    backend
        .force_unlock(lock_id)
        .await
        .map_err(|e| format!("Failed to unlock state: {}", e))?;
    println!("{}", format!("Lock {} removed.", lock_id).green());
    Ok(())
}

fn record_outcomes(state_file: &mut StateFile, plan: &Plan, result: &ApplyResult, provider: &str) {
    for (effect, outcome) in plan.effects().iter().zip(&result.outcomes) {
        match outcome {
            Ok(outcome) => {
                println!("  {} {}", "✓".green(), format_effect(effect));
                record_outcome(state_file, outcome, provider);
            }
            Err(e) => println!("  {} {} - {}", "✗".red(), format_effect(effect), e),
        }
    }
}

fn record_outcome(state_file: &mut StateFile, outcome: &EffectOutcome, provider: &str) {
    match outcome {
        EffectOutcome::Read { state }
        | EffectOutcome::Created { state }
        | EffectOutcome::Updated { state } => state_file.record(state, provider),
        EffectOutcome::Deleted { id } => {
            state_file.remove(id);
        }
        EffectOutcome::Skipped { .. } => {}
    }
}

/// Move resources whose live order does not match the request
fn position_warnings<'a>(states: impl IntoIterator<Item = &'a State>) -> Vec<String> {
    let mut warnings: Vec<String> = states
        .into_iter()
        .filter_map(|state| {
            state
                .get_string("state_pos")
                .filter(|message| !message.is_empty())
                .map(|message| format!("{}: {}", state.id, message))
        })
        .collect();
    warnings.sort();
    warnings
}

fn print_position_warnings<'a>(states: impl IntoIterator<Item = &'a State>) {
    for warning in position_warnings(states) {
        println!("{} {}", "Warning:".yellow().bold(), warning);
    }
}

fn print_plan(plan: &Plan) {
    if plan.is_empty() {
        println!("{}", "No changes. Device configuration is up-to-date.".green());
        return;
    }

    println!("{}", "Execution Plan:".cyan().bold());
    println!();

    for effect in plan.effects() {
        match effect {
            Effect::Create(resource) => {
                println!("  {} {}", "+".green().bold(), resource.id.to_string().bold());
                for (key, value) in sorted_attributes(&resource.attributes) {
                    println!("      {}: {}", key, format_value(value).green());
                }
            }
            Effect::Update { id, from, to } => {
                println!("  {} {}", "~".yellow().bold(), id.to_string().bold());
                for key in find_changed_attributes(&to.attributes, &from.attributes) {
                    let old = from
                        .attributes
                        .get(&key)
                        .map(format_value)
                        .unwrap_or_else(|| "(none)".to_string());
                    let new = to.attributes.get(&key).map(format_value).unwrap_or_default();
                    println!("      {}: {} → {}", key, old.red(), new.green());
                }
            }
            Effect::Delete { id, .. } => {
                println!("  {} {}", "-".red().bold(), id.to_string().bold());
            }
            Effect::Read(resource) => println!("  {} {}", "?".normal(), resource.id),
        }
    }

    println!();
    let summary = plan.summary();
    println!(
        "Plan: {} to add, {} to change, {} to destroy.",
        summary.create.to_string().green(),
        summary.update.to_string().yellow(),
        summary.delete.to_string().red()
    );
}

fn format_effect(effect: &Effect) -> String {
    match effect {
        Effect::Create(r) => format!("Create {}", r.id),
        Effect::Update { id, .. } => format!("Update {}", id),
        Effect::Delete { id, .. } => format!("Delete {}", id),
        Effect::Read(r) => format!("Read {}", r.id),
    }
}

fn sorted_attributes(attributes: &HashMap<String, Value>) -> Vec<(&String, &Value)> {
    let mut sorted: Vec<_> = attributes
        .iter()
        .filter(|(key, _)| !key.starts_with('_'))
        .collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    sorted
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => format!("\"{}\"", s),
        Value::Int(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::List(items) => {
            let strs: Vec<_> = items.iter().map(format_value).collect();
            format!("[{}]", strs.join(", "))
        }
        Value::Map(map) => {
            let mut strs: Vec<_> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            strs.sort();
            format!("{{{}}}", strs.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy_move(name: &str) -> Resource {
        Resource::new("firewall_policy_move", name)
            .with_attribute("device_name", "fgt-01")
            .with_attribute("policyid", 5)
            .with_attribute("target", 3)
            .with_attribute("option", "before")
    }

    fn existing(resource_type: &str, name: &str, identifier: &str) -> State {
        State::existing(ResourceId::new(resource_type, name), HashMap::new())
            .with_identifier(identifier)
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn prepare_resources_applies_defaults() {
        let prepared = prepare_resources(&[policy_move("web_first")]).unwrap();
        let resource = &prepared[0];
        assert_eq!(resource.get_string("device_vdom"), Some("root"));
        assert_eq!(resource.get_string("state_pos"), Some(""));
    }

    #[test]
    fn prepare_resources_normalizes_cidr_subnets() {
        let address = Resource::new("firewall_address", "web")
            .with_attribute("device_name", "fgt-01")
            .with_attribute("name", "web")
            .with_attribute("subnet", "10.0.1.0/24");
        let prepared = prepare_resources(&[address]).unwrap();
        assert_eq!(prepared[0].get_string("subnet"), Some("10.0.1.0 255.255.255.0"));
    }

    #[test]
    fn prepare_resources_collects_all_errors() {
        let resources = vec![
            Resource::new("firewall_policy_move", "incomplete")
                .with_attribute("device_name", "fgt-01")
                .with_attribute("policyid", 5),
            Resource::new("firewall_rule", "unknown"),
        ];

        let err = prepare_resources(&resources).unwrap_err();
        assert!(err.contains("firewall_policy_move.incomplete: Required attribute 'target' is missing"));
        assert!(err.contains("firewall_policy_move.incomplete: Required attribute 'option' is missing"));
        assert!(err.contains("firewall_rule.unknown: unknown resource type 'firewall_rule'"));
    }

    #[test]
    fn prepare_resources_rejects_state_pos_from_configuration() {
        let resource = policy_move("web_first").with_attribute("state_pos", "anything");
        let err = prepare_resources(&[resource]).unwrap_err();
        assert!(err.contains("'state_pos' is computed"));
    }

    #[test]
    fn destroy_plan_deletes_untracked_first_then_reverse_order() {
        let resources = vec![
            Resource::new("firewall_policy", "allow_web"),
            policy_move("web_first"),
        ];
        let mut current_states = HashMap::new();
        current_states.insert(
            resources[0].id.clone(),
            existing("firewall_policy", "allow_web", "5"),
        );
        current_states.insert(
            resources[1].id.clone(),
            existing("firewall_policy_move", "web_first", "5"),
        );
        let tracked = vec![existing("firewall_address", "old", "old")];

        let plan = destroy_plan(&resources, &current_states, &tracked);
        let order: Vec<String> = plan
            .effects()
            .iter()
            .map(|e| e.resource_id().to_string())
            .collect();
        assert_eq!(
            order,
            vec![
                "firewall_address.old",
                "firewall_policy_move.web_first",
                "firewall_policy.allow_web"
            ]
        );
    }

    #[test]
    fn destroy_plan_skips_missing_resources() {
        let resources = vec![Resource::new("firewall_address", "web")];
        let mut current_states = HashMap::new();
        current_states.insert(
            resources[0].id.clone(),
            State::not_found(resources[0].id.clone()),
        );
        assert!(destroy_plan(&resources, &current_states, &[]).is_empty());
    }

    #[test]
    fn record_outcome_updates_state_file() {
        let mut state_file = StateFile::new();
        let created = existing("firewall_address", "web", "web");
        record_outcome(
            &mut state_file,
            &EffectOutcome::Created { state: created },
            "fortimanager",
        );
        assert_eq!(
            state_file.identifier(&ResourceId::new("firewall_address", "web")),
            Some("web")
        );

        record_outcome(
            &mut state_file,
            &EffectOutcome::Deleted {
                id: ResourceId::new("firewall_address", "web"),
            },
            "fortimanager",
        );
        assert!(state_file.resources.is_empty());
    }

    #[test]
    fn position_warnings_only_report_mismatches() {
        let mut drifted = existing("firewall_policy_move", "b", "5");
        drifted.set_attribute("state_pos", "policyid(5) is 3 ahead of target(3)");
        let mut aligned = existing("firewall_policy_move", "a", "7");
        aligned.set_attribute("state_pos", "");
        let address = existing("firewall_address", "web", "web");

        let warnings = position_warnings([&drifted, &aligned, &address]);
        assert_eq!(
            warnings,
            vec!["firewall_policy_move.b: policyid(5) is 3 ahead of target(3)"]
        );
    }

    #[test]
    fn format_value_renders_nested_values() {
        let mut map = HashMap::new();
        map.insert("id".to_string(), Value::Int(1));
        map.insert("prefix".to_string(), Value::String("10.0.0.0 255.0.0.0".to_string()));
        let value = Value::List(vec![Value::Map(map), Value::Bool(true)]);
        assert_eq!(
            format_value(&value),
            "[{id: 1, prefix: \"10.0.0.0 255.0.0.0\"}, true]"
        );
    }
}
