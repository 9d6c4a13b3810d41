//! Everything the assistant says or shows

pub const COMMANDS_ANNOUNCEMENT: &str = "Available commands: Compose, Read, Search, Speed up or slow down, \
Summarize latest, Summarize all, List folders, Change folder, Exit. Press space to interrupt speech.";

pub const HELP: &str = "Unknown command. Available commands are: compose, read, search, speed up, \
slow down, summarize latest, summarize all, list folders, change folder, or exit.";

pub const ASK_RECIPIENT: &str = "What is the email address?";
pub const ASK_SUBJECT: &str = "What is the subject?";
pub const ASK_BODY: &str = "What is your message?";
pub const ASK_QUERY: &str = "What would you like to search for?";
pub const ASK_FOLDER: &str = "Which folder?";

pub const SEND_SUCCESS: &str = "Email sent successfully. What would you like to do next?";
pub const SEND_FAILED: &str = "Error sending email. Please try again.";

pub const READ_COMPLETE: &str = "Email reading complete. What would you like to do next?";
pub const READ_FAILED: &str = "Unable to read emails. Please try again.";

pub const NO_MATCHES: &str = "No matching emails found. What would you like to do next?";
pub const NO_MORE_RESULTS: &str = "No more results.";
pub const RESULTS_HINT: &str = "Say next or stop.";
pub const SEARCH_FAILED: &str = "Error searching emails.";

pub const NOTHING_TO_SUMMARIZE: &str = "There are no emails to summarize.";
pub const SUMMARIZE_FAILED: &str = "Unable to summarize emails. Please try again.";

pub const FOLDERS_FAILED: &str = "Unable to list folders. Please try again.";
pub const FOLDER_NOT_FOUND: &str = "Folder not found.";

pub const APOLOGY: &str = "An error occurred. Please try again.";
pub const GOODBYE: &str = "Goodbye";

// Status line texts
pub const STATUS_ACTIVATE: &str = "Press Enter to start";
pub const STATUS_STARTING: &str = "Starting voice system...";
pub const STATUS_LISTENING: &str = "Listening...";
pub const STATUS_PROCESSING: &str = "Processing command...";
pub const STATUS_SENDING: &str = "Sending email...";
pub const STATUS_FETCHING: &str = "Fetching emails...";
pub const STATUS_SEARCHING: &str = "Searching emails...";
pub const STATUS_SUMMARIZING: &str = "Summarizing...";
pub const STATUS_NO_MICROPHONE: &str = "Please allow microphone access and restart";

pub fn rate_changed(rate: f32) -> String {
    format!("Speech rate is now {}", rate)
}

pub fn read_intro(count: usize) -> String {
    if count == 1 {
        "Here is your latest email:".to_string()
    } else {
        format!("Here are your {} latest emails:", count)
    }
}

pub fn read_item(position: usize, from: &str, subject: &str, content: &str) -> String {
    format!(
        "Email {} from {}. Subject: {}. Message: {}",
        position, from, subject, content
    )
}

pub fn empty_folder(folder: &str) -> String {
    format!("No emails found in {}.", folder)
}

pub fn search_found(count: usize) -> String {
    format!("Found {} matching emails. Reading results.", count)
}

pub fn search_hit(position: usize, from: &str, subject: &str) -> String {
    format!(
        "Result {} from {}. Subject: {}. Say next for the next result or stop to finish.",
        position, from, subject
    )
}

pub fn summary_latest(from: &str, summary: &str) -> String {
    format!("Summary of the latest email from {}: {}", from, summary)
}

pub fn summary_all(count: usize, summary: &str) -> String {
    format!("Summary of your latest {} emails: {}", count, summary)
}

pub fn folder_list(folders: &[String]) -> String {
    if folders.is_empty() {
        "There are no folders.".to_string()
    } else {
        format!("Your folders are: {}.", folders.join(", "))
    }
}

pub fn folder_changed(folder: &str) -> String {
    format!("Current folder is now {}.", folder)
}

pub fn status_error(code: &str) -> String {
    format!("Error: {}", code)
}
