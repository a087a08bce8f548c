use super::*;
use interaction_mux_core::{Component, TextInputStyle};

#[test]
fn test_respond_sends_message() {
    let (writer, mut rx) = ResponseWriter::channel();

    writer.respond("hello").unwrap();

    match rx.try_recv().unwrap() {
        InteractionResponse::Message(message) => assert_eq!(message.content.as_deref(), Some("hello")),
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_each_action_maps_to_its_callback_type() {
    type Action = fn(ResponseWriter) -> Result<(), ResponseError>;
    let cases: [(Action, u8); 8] = [
        (|w| w.ack(), 1),
        (|w| w.respond("x"), 4),
        (|w| w.deferred_respond(), 5),
        (|w| w.deferred_respond_ephemeral(), 5),
        (|w| w.deferred_update(), 6),
        (|w| w.update("x"), 7),
        (|w| w.autocomplete([Choice::string("a", "a")]), 8),
        (|w| w.modal(Modal::new("m", "title")), 9),
    ];

    for (action, expected) in cases {
        let (writer, mut rx) = ResponseWriter::channel();

        action(writer).unwrap();

        assert_eq!(rx.try_recv().unwrap().callback_type(), expected);
    }
}

#[test]
fn test_deferred_ephemeral_sets_flag() {
    let (writer, mut rx) = ResponseWriter::channel();

    writer.deferred_respond_ephemeral().unwrap();

    match rx.try_recv().unwrap() {
        InteractionResponse::DeferredMessage { flags } => {
            assert!(flags.contains(MessageFlags::EPHEMERAL))
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_autocomplete_collects_choices_in_order() {
    let (writer, mut rx) = ResponseWriter::channel();

    writer
        .autocomplete(vec![Choice::string("milk", "milk"), Choice::integer("two", 2)])
        .unwrap();

    match rx.try_recv().unwrap() {
        InteractionResponse::Autocomplete(choices) => {
            let names: Vec<_> = choices.iter().map(|c| c.name.as_str()).collect();
            assert_eq!(names, vec!["milk", "two"]);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_modal_keeps_inputs() {
    let (writer, mut rx) = ResponseWriter::channel();
    let modal = Modal::new("feedback", "Feedback").input(Component::text_input(
        TextInputStyle::Paragraph,
        "Your thoughts",
        "feedback/text",
    ));

    writer.modal(modal.clone()).unwrap();

    match rx.try_recv().unwrap() {
        InteractionResponse::Modal(sent) => assert_eq!(sent, modal),
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_closed_request_reports_error() {
    let (writer, rx) = ResponseWriter::channel();
    drop(rx);

    assert!(writer.is_closed());
    assert_eq!(writer.respond("too late"), Err(ResponseError::Closed));
}
