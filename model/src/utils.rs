#[macro_export]
macro_rules! default {
    ($name: ident: $ty: path = $value: expr) => {
        paste::paste!{
            #[allow(dead_code)]
            pub(crate) fn [<default_ $name:snake>]() -> $ty {
                $value
            }
        }
    };
    ( $($ty: path: { $($name: ident = $value: expr), + $(,)?}), + $(,)?) => {
        $($(
            $crate::default!{
                $name: $ty = $value
            }
        )*)*
    };
}

default! {
    bool: { yes = true, no = false }
}
