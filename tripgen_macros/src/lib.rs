mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Implements `tripgen_rs::schema::CompletionSchema` for a named struct.
///
/// The struct must also derive `schemars::JsonSchema`. Struct and field doc
/// comments become the schema's title/description metadata, so they end up
/// in the tool definition sent to the provider.
///
/// ```ignore
/// #[derive(Deserialize, JsonSchema)]
/// #[completion_schema(name = "city_guide", description = "A short city guide")]
/// pub struct CityGuide {
///     /// City name
///     pub city: String,
/// }
/// ```
#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
