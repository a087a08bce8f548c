//! Demo route set: a per-user todo list.
//!
//! Exercises every handler kind. The list is caller-owned state shared by
//! the handlers through an `Arc`.

use interaction_mux_api::{HandlerError, InteractionRequest, Mount, ResponseWriter};
use interaction_mux_core::{
    AutocompleteData, ButtonData, ButtonStyle, Choice, CommandOption, CreateCommand, Component,
    Message, Modal, ModalData, OptionType, OptionValue, SlashCommandData, Snowflake,
    TextInputStyle, UserCommandData,
};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// Name of the user command listing someone else's items
pub const SHOW_TODOS: &str = "Show todos";

const MAX_CHOICES: usize = 25;

/// Todo items keyed by user
#[derive(Debug, Default)]
pub struct TodoList {
    items: Mutex<HashMap<Snowflake, Vec<String>>>,
}

impl TodoList {
    /// Append `item`, returning the new number of items
    pub fn add(&self, user: Snowflake, item: impl Into<String>) -> usize {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let list = items.entry(user).or_default();
        list.push(item.into());
        list.len()
    }

    pub fn items(&self, user: Snowflake) -> Vec<String> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.get(&user).cloned().unwrap_or_default()
    }

    /// Remove the first item equal to `item`
    pub fn complete(&self, user: Snowflake, item: &str) -> bool {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = items.get_mut(&user) else {
            return false;
        };
        match list.iter().position(|i| i == item) {
            Some(index) => {
                list.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every item, returning how many there were
    pub fn clear(&self, user: Snowflake) -> usize {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(&user).map(|list| list.len()).unwrap_or(0)
    }

    /// Items containing `partial`, case-insensitively
    pub fn matching(&self, user: Snowflake, partial: &str) -> Vec<String> {
        let partial = partial.to_lowercase();
        self.items(user)
            .into_iter()
            .filter(|item| item.to_lowercase().contains(&partial))
            .take(MAX_CHOICES)
            .collect()
    }
}

// ============================================================================
// Registration
// ============================================================================

/// Command definitions matching [`mount`]
pub fn commands() -> Vec<CreateCommand> {
    let item = |description: &str| {
        CommandOption::new(OptionType::String, "item", description).required()
    };

    vec![
        CreateCommand::slash("todo", "Manage your todo list")
            .option(CommandOption::subcommand(
                "add",
                "Add an item",
                vec![item("What to add")],
            ))
            .option(CommandOption::subcommand("list", "Show your items", vec![]))
            .option(CommandOption::subcommand(
                "done",
                "Complete an item",
                vec![item("Item to complete").autocomplete()],
            )),
        CreateCommand::user(SHOW_TODOS),
    ]
}

/// Register the todo handlers on `mux`
pub fn mount(mux: &mut impl Mount, list: &Arc<TodoList>) {
    mux.route("todo", |r| {
        r.command("add", bind(list, add_item));
        r.command("list", bind(list, list_items));
        r.command("done", bind(list, complete_item));
        r.autocomplete("done", bind(list, suggest_items));
        r.button("clear", bind(list, clear_items));
        r.button("new", bind(list, open_new_item));
        r.modal("new", bind(list, submit_new_item));
    });
    mux.user_command(SHOW_TODOS, bind(list, show_items));
}

/// Close a handler over the shared list
fn bind<T, F, Fut>(
    list: &Arc<TodoList>,
    handler: F,
) -> impl Fn(ResponseWriter, InteractionRequest<T>) -> Fut + Send + Sync + 'static
where
    T: Send + 'static,
    F: Fn(Arc<TodoList>, ResponseWriter, InteractionRequest<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    let list = Arc::clone(list);
    move |writer, request| handler(Arc::clone(&list), writer, request)
}

fn invoker_id<T>(request: &InteractionRequest<T>) -> Snowflake {
    request.invoker().map(|u| u.id).unwrap_or_default()
}

fn render(items: &[String]) -> String {
    if items.is_empty() {
        return "Nothing to do.".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}. {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

// ============================================================================
// Handlers
// ============================================================================

async fn add_item(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<SlashCommandData>,
) -> Result<(), HandlerError> {
    let item = request.data.options.string("item")?;
    let count = list.add(invoker_id(&request), item);
    let content = format!("Added \"{}\" ({} open)", item, count);
    writer.respond(Message::new(content).ephemeral())?;
    Ok(())
}

async fn list_items(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<SlashCommandData>,
) -> Result<(), HandlerError> {
    let items = list.items(invoker_id(&request));
    let buttons = Component::action_row(vec![
        Component::button(ButtonStyle::Primary, "Add", "todo/new"),
        Component::button(ButtonStyle::Danger, "Clear", "todo/clear"),
    ]);
    writer.respond(Message::new(render(&items)).component(buttons).ephemeral())?;
    Ok(())
}

async fn complete_item(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<SlashCommandData>,
) -> Result<(), HandlerError> {
    let item = request.data.options.string("item")?;
    let content = if list.complete(invoker_id(&request), item) {
        format!("Completed \"{}\"", item)
    } else {
        format!("\"{}\" is not on your list", item)
    };
    writer.respond(Message::new(content).ephemeral())?;
    Ok(())
}

async fn suggest_items(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<AutocompleteData>,
) -> Result<(), HandlerError> {
    let partial = match request.data.focused() {
        Some((_, OptionValue::String(partial))) => partial.as_str(),
        _ => "",
    };
    let choices = list
        .matching(invoker_id(&request), partial)
        .into_iter()
        .map(|item| Choice::string(item.clone(), item));
    writer.autocomplete(choices)?;
    Ok(())
}

async fn clear_items(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<ButtonData>,
) -> Result<(), HandlerError> {
    let cleared = list.clear(invoker_id(&request));
    writer.update(format!("Cleared {} item(s).", cleared))?;
    Ok(())
}

async fn open_new_item(
    _list: Arc<TodoList>,
    writer: ResponseWriter,
    _request: InteractionRequest<ButtonData>,
) -> Result<(), HandlerError> {
    let modal = Modal::new("todo/new", "New item")
        .input(Component::text_input(TextInputStyle::Short, "Item", "item").required(true));
    writer.modal(modal)?;
    Ok(())
}

async fn submit_new_item(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<ModalData>,
) -> Result<(), HandlerError> {
    let Some(item) = request.data.value("item").filter(|v| !v.trim().is_empty()) else {
        writer.respond(Message::new("An item needs a name.").ephemeral())?;
        return Ok(());
    };
    let item = item.trim();
    let count = list.add(invoker_id(&request), item);
    let content = format!("Added \"{}\" ({} open)", item, count);
    writer.respond(Message::new(content).ephemeral())?;
    Ok(())
}

async fn show_items(
    list: Arc<TodoList>,
    writer: ResponseWriter,
    request: InteractionRequest<UserCommandData>,
) -> Result<(), HandlerError> {
    let target = request.data.target_id;
    let items = list.items(target);
    let content = format!("<@{}>'s list:\n{}", target, render(&items));
    writer.respond(Message::new(content).ephemeral())?;
    Ok(())
}

#[cfg(test)]
#[path = "todo_tests.rs"]
mod tests;
