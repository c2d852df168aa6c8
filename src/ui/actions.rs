//! Catalog of what the user can do from the main screen and the fields each
//! action asks for before it runs.

/// Every operation reachable from the menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    AddMember,
    ListMembers,
    FindMember,
    AddBook,
    ListBooks,
    FindBook,
    LendBook,
    ReturnBook,
    ActiveLoans,
    AddComment,
    BookComments,
}

/// What kind of characters a form field accepts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum FieldKind {
    Text,
    Integer,
    /// Integer that may start with a minus sign.
    SignedInteger,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct FieldSpec {
    pub(crate) label: &'static str,
    pub(crate) kind: FieldKind,
}

const fn text(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        kind: FieldKind::Text,
    }
}

const fn integer(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        kind: FieldKind::Integer,
    }
}

const fn signed(label: &'static str) -> FieldSpec {
    FieldSpec {
        label,
        kind: FieldKind::SignedInteger,
    }
}

const MEMBER_FIELDS: &[FieldSpec] = &[text("Name"), text("Email")];
const NAME_FIELDS: &[FieldSpec] = &[text("Name")];
const BOOK_FIELDS: &[FieldSpec] = &[text("Title"), text("Author"), signed("Year")];
const TITLE_FIELDS: &[FieldSpec] = &[text("Title")];
const LOAN_FIELDS: &[FieldSpec] = &[integer("Member ID"), integer("Book ID")];
const COMMENT_FIELDS: &[FieldSpec] = &[integer("Member ID"), integer("Book ID"), text("Comment")];
const BOOK_ID_FIELDS: &[FieldSpec] = &[integer("Book ID")];

impl Action {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Action::AddMember => "Add member",
            Action::ListMembers => "List all members",
            Action::FindMember => "Find member by name",
            Action::AddBook => "Add book",
            Action::ListBooks => "List all books",
            Action::FindBook => "Find book by title",
            Action::LendBook => "Lend book",
            Action::ReturnBook => "Return book",
            Action::ActiveLoans => "Books currently out",
            Action::AddComment => "Add comment",
            Action::BookComments => "Comments on a book",
        }
    }

    /// Fields collected by the modal form. Empty means the action runs as soon
    /// as it is picked.
    pub(crate) fn fields(self) -> &'static [FieldSpec] {
        match self {
            Action::AddMember => MEMBER_FIELDS,
            Action::FindMember => NAME_FIELDS,
            Action::AddBook => BOOK_FIELDS,
            Action::FindBook => TITLE_FIELDS,
            Action::LendBook | Action::ReturnBook => LOAN_FIELDS,
            Action::AddComment => COMMENT_FIELDS,
            Action::BookComments => BOOK_ID_FIELDS,
            Action::ListMembers | Action::ListBooks | Action::ActiveLoans => &[],
        }
    }

    pub(crate) fn needs_input(self) -> bool {
        !self.fields().is_empty()
    }
}

/// A column on the main screen.
pub(crate) struct Section {
    pub(crate) title: &'static str,
    pub(crate) actions: &'static [Action],
}

pub(crate) const SECTIONS: &[Section] = &[
    Section {
        title: "Members",
        actions: &[Action::AddMember, Action::ListMembers, Action::FindMember],
    },
    Section {
        title: "Books",
        actions: &[Action::AddBook, Action::ListBooks, Action::FindBook],
    },
    Section {
        title: "Loans",
        actions: &[Action::LendBook, Action::ReturnBook, Action::ActiveLoans],
    },
    Section {
        title: "Comments",
        actions: &[Action::AddComment, Action::BookComments],
    },
];

/// Typed arguments for one club operation, produced by a validated form.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Request {
    AddMember { name: String, email: String },
    ListMembers,
    FindMembers { name: String },
    AddBook { title: String, author: String, year: i64 },
    ListBooks,
    FindBooks { title: String },
    Lend { member_id: i64, book_id: i64 },
    Return { member_id: i64, book_id: i64 },
    ActiveLoans,
    AddComment { member_id: i64, book_id: i64, text: String },
    BookComments { book_id: i64 },
}
