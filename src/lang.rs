//! Static EDL language tables.
//!
//! Keywords, builtin functions, and types with their documentation, used by
//! the completion and hover handlers. Pure lookup tables, no analysis.

/// EDL keywords
pub const KEYWORDS: &[&str] = &[
    "event",
    "trigger",
    "action",
    "condition",
    "state",
    "transition",
    "handler",
    "listener",
    "async",
    "sync",
    "parallel",
    "sequential",
    "priority",
    "timeout",
    "if",
    "else",
    "while",
    "for",
    "do",
    "break",
    "continue",
    "return",
    "switch",
    "case",
    "default",
    "import",
    "export",
    "module",
    "namespace",
    "use",
    "include",
];

/// EDL built-in functions
pub const BUILTIN_FUNCTIONS: &[&str] = &[
    "emit", "listen", "schedule", "delay", "cancel", "log", "debug", "error", "warn", "info",
];

/// EDL types
pub const TYPES: &[&str] = &[
    "int",
    "float",
    "string",
    "bool",
    "void",
    "any",
    "Event",
    "State",
    "Transition",
    "Handler",
    "Timer",
    "Queue",
    "Channel",
];

/// Short documentation for a keyword, used as completion documentation.
pub fn keyword_doc(keyword: &str) -> &'static str {
    match keyword {
        "event" => "Defines an event that can be triggered in the system",
        "trigger" => "Activates an event or condition",
        "action" => "Defines an action to be executed",
        "condition" => "Specifies a condition for event handling",
        "state" => "Defines a state in a state machine",
        "transition" => "Defines a transition between states",
        "handler" => "Defines an event handler function",
        "listener" => "Creates an event listener",
        "async" => "Marks a function as asynchronous",
        "sync" => "Marks a function as synchronous",
        "parallel" => "Executes operations in parallel",
        "sequential" => "Executes operations sequentially",
        _ => "EDL keyword",
    }
}

/// Short documentation for a builtin function.
pub fn function_doc(func: &str) -> &'static str {
    match func {
        "emit" => "Emits an event to the system",
        "listen" => "Listens for specific events",
        "schedule" => "Schedules an event for future execution",
        "delay" => "Delays execution for a specified time",
        "cancel" => "Cancels a scheduled event",
        "log" => "Logs a message",
        "debug" => "Logs a debug message",
        "error" => "Logs an error message",
        "warn" => "Logs a warning message",
        "info" => "Logs an info message",
        _ => "EDL built-in function",
    }
}

/// Short documentation for a type.
pub fn type_doc(ty: &str) -> &'static str {
    match ty {
        "Event" => "Represents an event object",
        "State" => "Represents a state in a state machine",
        "Transition" => "Represents a state transition",
        "Handler" => "Represents an event handler",
        "Timer" => "Represents a timer object",
        "Queue" => "Represents an event queue",
        "Channel" => "Represents a communication channel",
        _ => "EDL type",
    }
}

/// Rich markdown shown on hover for a token, if it is documented.
///
/// Covers keywords, builtin functions, types, and the flow operators.
pub fn hover_markdown(token: &str) -> Option<&'static str> {
    let doc = match token {
        // Keywords
        "event" => {
            "**event** - Defines an event that can be triggered in the system\n\n```edl\nevent user_login {\n    user_id: string\n    timestamp: int\n}\n```"
        }
        "trigger" => "**trigger** - Activates an event or condition\n\n```edl\ntrigger user_login_event\n```",
        "state" => {
            "**state** - Defines a state in a state machine\n\n```edl\nstate idle {\n    on_event -> active\n}\n```"
        }
        "transition" => {
            "**transition** - Defines a transition between states\n\n```edl\ntransition idle -> active on user_input\n```"
        }

        // Built-in functions
        "emit" => {
            "**emit(event, data?)** - Emits an event to the system\n\n```edl\nemit(user_login, { user_id: \"123\" })\n```"
        }
        "listen" => {
            "**listen(event, handler)** - Listens for specific events\n\n```edl\nlisten(user_login, handle_login)\n```"
        }
        "schedule" => {
            "**schedule(event, delay)** - Schedules an event for future execution\n\n```edl\nschedule(cleanup_event, 3600) // 1 hour delay\n```"
        }
        "delay" => {
            "**delay(milliseconds)** - Delays execution for a specified time\n\n```edl\ndelay(1000) // Wait 1 second\n```"
        }

        // Types
        "Event" => {
            "**Event** - Base type for all events in the system\n\nContains timestamp, type, and data properties"
        }
        "State" => "**State** - Represents a state in a state machine\n\nContains name, transitions, and handlers",
        "Handler" => {
            "**Handler** - Function type for event handlers\n\n```edl\nHandler<EventType> = (event: EventType) -> void\n```"
        }

        // Operators
        "->" => "**->** - Event flow operator\n\nDefines the flow from one event to another",
        "=>" => "**=>** - Function arrow operator\n\nUsed in lambda expressions and function definitions",
        "<-" => "**<-** - Reverse flow operator\n\nDefines reverse event flow or data binding",
        "|>" => "**|>** - Pipe operator\n\nPipes data through a series of transformations",

        _ => return None,
    };

    Some(doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_keyword() {
        assert_eq!(
            keyword_doc("event"),
            "Defines an event that can be triggered in the system"
        );
        assert_eq!(keyword_doc("while"), "EDL keyword");
    }

    #[test]
    fn test_hover_covers_operators() {
        assert!(hover_markdown("->").is_some());
        assert!(hover_markdown("|>").is_some());
        assert!(hover_markdown("nonsense").is_none());
    }

    #[test]
    fn test_every_builtin_has_specific_doc() {
        for func in BUILTIN_FUNCTIONS {
            assert_ne!(function_doc(func), "EDL built-in function", "{func}");
        }
    }
}
