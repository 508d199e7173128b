/// Type that allows to return data with the error
///
/// Entry points that take ownership of a buffer use this as error type, so the
/// caller gets its original bytes back when processing fails.
pub struct ErrorWithData<E: std::error::Error> {
    err: E,
    data: Vec<u8>,
}

impl<E: std::error::Error> ErrorWithData<E> {
    pub fn new(err: E, data: Vec<u8>) -> Self {
        Self { err, data }
    }

    pub fn err(&self) -> &E {
        &self.err
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    pub fn into_parts(self) -> (E, Vec<u8>) {
        (self.err, self.data)
    }
}

impl<E: std::error::Error> std::fmt::Debug for ErrorWithData<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorWithData")
            .field("err", &self.err)
            .field("data", &format!("{} bytes", self.data.len()))
            .finish()
    }
}

impl<E: std::error::Error> std::fmt::Display for ErrorWithData<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl<E: std::error::Error + 'static> std::error::Error for ErrorWithData<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.err)
    }
}
