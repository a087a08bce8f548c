use super::*;
use serde_json::json;

#[test]
fn test_slash_command_with_nested_subcommands_serializes() {
    // Arrange
    let command = CreateCommand::slash("todo", "Manage the todo list")
        .option(CommandOption::subcommand(
            "add",
            "Add an item",
            vec![CommandOption::new(OptionType::String, "name", "Item name").required()],
        ))
        .option(CommandOption::subcommand("list", "Show all items", vec![]));

    // Act
    let value = serde_json::to_value(&command).unwrap();

    // Assert
    assert_eq!(
        value,
        json!({
            "name": "todo",
            "type": 1,
            "description": "Manage the todo list",
            "options": [
                {
                    "name": "add",
                    "type": 1,
                    "description": "Add an item",
                    "options": [
                        {"name": "name", "type": 3, "description": "Item name", "required": true}
                    ]
                },
                {"name": "list", "type": 1, "description": "Show all items"}
            ]
        })
    );
}

#[test]
fn test_user_command_omits_description() {
    let value = serde_json::to_value(CreateCommand::user("High Five")).unwrap();

    assert_eq!(value, json!({"name": "High Five", "type": 2}));
}

#[test]
fn test_registered_command_deserializes() {
    let body = json!({
        "id": "1001",
        "application_id": "2002",
        "type": 1,
        "name": "todo",
        "description": "Manage the todo list",
        "version": "3003",
        "options": [
            {"name": "add", "type": 1, "description": "Add an item"}
        ]
    });

    let command: ApplicationCommand = serde_json::from_value(body).unwrap();

    assert_eq!(command.id, Snowflake::new(1001));
    assert_eq!(command.command_type, CommandType::ChatInput);
    assert_eq!(command.options[0].option_type, OptionType::SubCommand);
    assert!(command.guild_id.is_none());
}
