use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "No task definition matches asset {}.", _0)]
    Unresolved(String),
    #[fail(display = "Task definition {} has not been registered.", _0)]
    UnknownKind(String),
    #[fail(display = "URL({}) is malformed.", _0)]
    MalformedUrl(String),
    #[fail(display = "The schema of url {} has not been supported yet!", _0)]
    UnsupportedSchema(String),
    #[fail(display = "{}", _0)]
    Shortcut(String),
    #[fail(display = "Could not found resource at {}.", _0)]
    NotFound(String),
    #[fail(display = "{}", _0)]
    IO(::std::io::Error),
    #[fail(display = "{}", _0)]
    Json(::serde_json::Error),
    #[fail(display = "{}", _0)]
    Image(::image::ImageError),
    #[fail(display = "{}", _0)]
    Malformed(String),
    #[fail(display = "The asset manager has been destroyed.")]
    Destroyed,
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Self {
        Error::IO(err)
    }
}

impl From<::serde_json::Error> for Error {
    fn from(err: ::serde_json::Error) -> Self {
        Error::Json(err)
    }
}

impl From<::image::ImageError> for Error {
    fn from(err: ::image::ImageError) -> Self {
        Error::Image(err)
    }
}
