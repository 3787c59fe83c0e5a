//! The rendering seam: declarative, immediate-mode page primitives.
//!
//! A host implements [`Ui`] and re-invokes the render pass on every user
//! interaction. The host owns all widget state between passes; the library
//! only asks for current values and says when to clear them.

use crate::libs::form::FieldSpec;
use crate::libs::schema::Record;

pub trait Ui {
    fn title(&mut self, text: &str);

    fn header(&mut self, text: &str);

    /// Plain text line, for things like "No records found.".
    fn text(&mut self, text: &str);

    /// Tabular display of the listing, columns in inferred order.
    fn table(&mut self, columns: &[String], rows: &[Record]);

    /// Render one typed input and return its current contents. Blank
    /// widgets return an empty string.
    fn input(&mut self, field: &FieldSpec) -> String;

    /// Render the submit boundary. Returns true when this pass was
    /// triggered by a submission, in which case the insert logic runs
    /// exactly once.
    fn submit_button(&mut self, label: &str) -> bool;

    fn success(&mut self, message: &str);

    fn warning(&mut self, message: &str);

    fn error(&mut self, message: &str);

    /// Forget widget contents. Called only after a successful insert;
    /// failed submissions keep the user's input for correction.
    fn clear_inputs(&mut self);

    /// Ask the host to run a fresh pass so a new row shows up in the
    /// listing.
    fn request_rerun(&mut self);
}
