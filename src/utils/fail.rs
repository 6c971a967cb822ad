use std::error::Error;

use super::super::Metadata;


/// Trait to make tagging spans on error easier and nicer.
///
/// The most common use is for [`Result`] instances in combination with the `?` operator.
/// Errors are recorded in the `Metadata` that will be attached to the span,
/// using the Zipkin `error` binary annotation.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use std::num::ParseIntError;
///
/// use zipkin_b3::Metadata;
/// use zipkin_b3::utils::FailSpan;
///
/// fn work(metadata: &mut Metadata) -> Result<i32, ParseIntError> {
///     let ten = "10".parse::<i32>().fail_span(&mut *metadata)?;
///     let two = "2".parse::<i32>().fail_span(&mut *metadata)?;
///     Ok(ten * two)
/// }
///
/// fn main() {
///     let mut metadata = Metadata::new();
///     let result = work(&mut metadata).unwrap();
///     println!("{}", result);
///     assert!(metadata.get("error").is_none());
/// }
/// ```
///
/// [`Result`]: https://doc.rust-lang.org/std/result/enum.Result.html
pub trait FailSpan {
    type Error: Error + ?Sized;

    /// Access the current error information, if any.
    ///
    /// Returns [`None`] if there was no error.
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    fn error(&self) -> Option<&Self::Error>;

    /// Tags the metadata of a span as failed if there was an error.
    ///
    /// The `error` key is set to the error message, as Zipkin expects.
    /// An `error.object` key records the debug representation of the error.
    ///
    /// Nothing is done if there was no error (`error()` returns [`None`]).
    ///
    /// [`None`]: https://doc.rust-lang.org/std/option/enum.Option.html#variant.None
    fn fail_span<M>(self, metadata: M) -> Self where M: AsMut<Metadata>;
}

impl<T, E> FailSpan for Result<T, E> where
    E: Error
{
    type Error = E;

    fn error(&self) -> Option<&E> {
        self.as_ref().err()
    }

    fn fail_span<M>(self, mut metadata: M) -> Result<T, E> where M: AsMut<Metadata> {
        if let Some(error) = self.error() {
            let metadata = metadata.as_mut();
            metadata.set("error", error.to_string());
            metadata.set("error.object", format!("{:?}", error));
        }
        self
    }
}
