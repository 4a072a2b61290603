//! Command Surface - Text Commands and Modules
//!
//! Commands are registered by [`CommandModule`]s into a [`CommandRegistry`],
//! which resolves labels (case-insensitively) to command executors.

pub mod gc_module;

pub use gc_module::GcMonitoringModule;

use crate::error::{GcmonError, Result};
use crate::platform::Platform;
use crate::sink::ResponseSink;
use indexmap::IndexMap;
use std::sync::Arc;

/// Everything a command executor receives
pub struct CommandContext<'a> {
    pub platform: &'a Arc<dyn Platform>,
    pub response: &'a Arc<dyn ResponseSink>,
    pub arguments: &'a [String],
}

/// Command body
pub type CommandExecutor = Arc<dyn Fn(&CommandContext<'_>) -> Result<()> + Send + Sync>;

/// A named command
#[derive(Clone)]
pub struct Command {
    aliases: Vec<String>,
    executor: CommandExecutor,
}

impl Command {
    pub fn builder() -> CommandBuilder {
        CommandBuilder::default()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// First alias, used when listing commands
    pub fn primary_alias(&self) -> &str {
        &self.aliases[0]
    }

    pub fn execute(&self, context: &CommandContext<'_>) -> Result<()> {
        (self.executor)(context)
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("aliases", &self.aliases)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Command`]
#[derive(Default)]
pub struct CommandBuilder {
    aliases: Vec<String>,
    executor: Option<CommandExecutor>,
}

impl CommandBuilder {
    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|alias| alias.into().to_lowercase()));
        self
    }

    pub fn executor<F>(mut self, executor: F) -> Self
    where
        F: Fn(&CommandContext<'_>) -> Result<()> + Send + Sync + 'static,
    {
        self.executor = Some(Arc::new(executor));
        self
    }

    pub fn build(self) -> Result<Command> {
        if self.aliases.is_empty() || self.aliases.iter().any(|a| a.trim().is_empty()) {
            return Err(GcmonError::InvalidArgument(
                "command needs at least one non-empty alias".to_string(),
            ));
        }

        let executor = self.executor.ok_or_else(|| {
            GcmonError::InvalidArgument(format!("command '{}' has no executor", self.aliases[0]))
        })?;

        Ok(Command {
            aliases: self.aliases,
            executor,
        })
    }
}

/// A group of related commands with shared state
pub trait CommandModule: Send + Sync {
    /// Register this module's commands
    fn register_commands(&self, registry: &mut CommandRegistry) -> Result<()>;

    /// Release module resources; called on shutdown
    fn close(&self) {}
}

/// Alias lookup table plus the modules that own the commands
#[derive(Default)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    by_alias: IndexMap<String, usize>,
    modules: Vec<Arc<dyn CommandModule>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command; fails without changes if any alias is taken
    pub fn register(&mut self, command: Command) -> Result<()> {
        if let Some(alias) = command
            .aliases()
            .iter()
            .find(|alias| self.by_alias.contains_key(alias.as_str()))
        {
            return Err(GcmonError::DuplicateAlias {
                alias: alias.clone(),
            });
        }

        let index = self.commands.len();
        for alias in command.aliases() {
            self.by_alias.insert(alias.clone(), index);
        }
        self.commands.push(command);
        Ok(())
    }

    /// Register every command of `module` and keep it for [`close_all`]
    ///
    /// [`close_all`]: CommandRegistry::close_all
    pub fn register_module(&mut self, module: Arc<dyn CommandModule>) -> Result<()> {
        module.register_commands(self)?;
        self.modules.push(module);
        Ok(())
    }

    pub fn find(&self, label: &str) -> Option<&Command> {
        self.by_alias
            .get(label.trim().to_lowercase().as_str())
            .map(|index| &self.commands[*index])
    }

    /// Run the command registered under `label`
    pub fn dispatch(&self, label: &str, context: &CommandContext<'_>) -> Result<()> {
        let command = self.find(label).ok_or_else(|| GcmonError::UnknownCommand {
            label: label.trim().to_string(),
        })?;
        command.execute(context)
    }

    /// Every registered alias, in registration order
    pub fn aliases(&self) -> Vec<&str> {
        self.by_alias.keys().map(String::as_str).collect()
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Close every registered module
    pub fn close_all(&self) {
        for module in &self.modules {
            module.close();
        }
    }
}
