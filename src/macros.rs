//! Declarative proxy generation.

/// Declare a remote interface and generate its proxy.
///
/// Each method lists an HTTP verb, a path template with `{param}`
/// placeholders, an optional `cache = "<duration>"`, and a signature. The
/// macro emits an async trait with the given name and a proxy struct that
/// implements both the trait and [`ApiInterface`](crate::ApiInterface).
///
/// ```rust,ignore
/// clientgen::http_api! {
///     pub trait RatesApi for RatesClient {
///         GET "/rates/{currency}", cache = "00:10:00";
///         fn latest(currency: &str) -> Rate;
///
///         POST "/rates";
///         fn publish(body: Rate) -> ();
///     }
/// }
///
/// let client: RatesClient = generator.generate()?;
/// let rate = client.latest("EUR").await?;
/// ```
#[macro_export]
macro_rules! http_api {
    (
        $(#[$meta:meta])*
        $vis:vis trait $api:ident for $proxy:ident {
            $(
                $verb:ident $path:literal $(, cache = $cache:literal)? ;
                fn $method:ident ( $( $arg:ident : $arg_ty:ty ),* $(,)? ) -> $ret:ty ;
            )*
        }
    ) => {
        $(#[$meta])*
        #[$crate::__private::async_trait::async_trait]
        $vis trait $api: Send + Sync {
            $(
                async fn $method(&self $(, $arg: $arg_ty)*) -> $crate::Result<$ret>;
            )*
        }

        #[derive(Clone, Debug)]
        $vis struct $proxy {
            invoker: $crate::ProxyInvoker,
        }

        impl $proxy {
            /// A copy of this proxy whose calls observe `cancel`.
            pub fn with_cancel_handle(&self, cancel: $crate::CancelHandle) -> Self {
                Self {
                    invoker: self.invoker.with_cancel_handle(cancel),
                }
            }
        }

        impl $crate::ApiInterface for $proxy {
            fn contract() -> $crate::InterfaceContract {
                $crate::InterfaceContract::new(stringify!($api))
                $(
                    .method(
                        $crate::MethodDescriptor::new(
                            stringify!($method),
                            $crate::RequestTemplate::new(stringify!($verb), $path),
                        )
                        .with_params(&[$(stringify!($arg)),*])
                        .with_signature(stringify!(fn $method($($arg: $arg_ty),*) -> $ret))
                        $(.with_caching($cache))?
                    )
                )*
            }

            fn from_invoker(invoker: $crate::ProxyInvoker) -> Self {
                Self { invoker }
            }
        }

        #[$crate::__private::async_trait::async_trait]
        impl $api for $proxy {
            $(
                async fn $method(&self $(, $arg: $arg_ty)*) -> $crate::Result<$ret> {
                    let args = vec![$($crate::CallArgument::new(stringify!($arg), &$arg)?),*];
                    self.invoker.call(stringify!($method), args).await
                }
            )*
        }
    };
}
