//! Closed categorical dimensions shared by records, filters and reports.
//!
//! Every dimension serialises as its display label and parses from either
//! the label or a plain-ASCII slug, case-insensitively.

macro_rules! labeled_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $($variant:ident => $label:literal / $slug:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            pub const fn slug(self) -> &'static str {
                match self {
                    $($name::$variant => $slug),+
                }
            }

            pub fn parse(value: &str) -> $crate::error::DashResult<Self> {
                let needle = value.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| {
                        v.as_str().eq_ignore_ascii_case(needle)
                            || v.slug().eq_ignore_ascii_case(needle)
                    })
                    .ok_or_else(|| {
                        let expected = Self::ALL
                            .iter()
                            .map(|v| v.slug())
                            .collect::<Vec<_>>()
                            .join(", ");
                        $crate::error::DashError::InvalidArgument(format!(
                            "unknown {} '{needle}' (expected one of: {expected})",
                            $kind
                        ))
                    })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

pub(crate) use labeled_enum;

labeled_enum! {
    pub enum Channel("channel") {
        Store => "Tienda" / "tienda",
        Online => "E-commerce" / "ecommerce",
    }
}

labeled_enum! {
    pub enum Region("region") {
        Bajio => "Bajío" / "bajio",
        CentroBajio => "Centro-Bajío" / "centro-bajio",
        Occidente => "Occidente" / "occidente",
    }
}

labeled_enum! {
    pub enum MxState("state") {
        Guanajuato => "Guanajuato" / "guanajuato",
        Queretaro => "Querétaro" / "queretaro",
        Michoacan => "Michoacán" / "michoacan",
        Jalisco => "Jalisco" / "jalisco",
        EstadoDeMexico => "Estado de México" / "edomex",
        Cdmx => "CDMX" / "cdmx",
        SanLuisPotosi => "San Luis Potosí" / "slp",
        Aguascalientes => "Aguascalientes" / "aguascalientes",
        Hidalgo => "Hidalgo" / "hidalgo",
        Puebla => "Puebla" / "puebla",
    }
}

impl MxState {
    /// `[longitude, latitude]` of the state capital.
    pub const fn coordinates(self) -> [f64; 2] {
        match self {
            Self::Guanajuato => [-101.257, 20.676],
            Self::Queretaro => [-100.389, 20.588],
            Self::Michoacan => [-101.194, 19.703],
            Self::Jalisco => [-103.35, 20.67],
            Self::EstadoDeMexico => [-99.67, 19.35],
            Self::Cdmx => [-99.133, 19.433],
            Self::SanLuisPotosi => [-100.985, 22.156],
            Self::Aguascalientes => [-102.297, 21.882],
            Self::Hidalgo => [-98.76, 20.123],
            Self::Puebla => [-98.206, 19.043],
        }
    }
}

labeled_enum! {
    pub enum ProductLine("category") {
        LineaBlanca => "Línea Blanca" / "linea-blanca",
        Cocina => "Cocina y Electrodomesticos" / "cocina",
        Hogar => "Hogar" / "hogar",
        Negocio => "Negocio" / "negocio",
    }
}

impl ProductLine {
    pub const fn code(self) -> &'static str {
        match self {
            Self::LineaBlanca => "LB",
            Self::Cocina => "CE",
            Self::Hogar => "HG",
            Self::Negocio => "NG",
        }
    }
}

labeled_enum! {
    pub enum DeliveryType("delivery type") {
        Pickup => "Pickup" / "pickup",
        Delivery => "Delivery" / "delivery",
    }
}

labeled_enum! {
    pub enum Carrier("carrier") {
        Dhl => "DHL" / "dhl",
        Estafeta => "Estafeta" / "estafeta",
        Fedex => "FedEx" / "fedex",
        Paquetexpress => "Paquetexpress" / "paquetexpress",
        Minutos99 => "99Minutos" / "99minutos",
    }
}

impl Carrier {
    pub const fn base_cost_per_order(self) -> f64 {
        match self {
            Self::Dhl => 81.0,
            Self::Estafeta => 74.0,
            Self::Fedex => 86.0,
            Self::Paquetexpress => 72.0,
            Self::Minutos99 => 66.0,
        }
    }

    pub const fn lead_days(self) -> f64 {
        match self {
            Self::Dhl => 2.4,
            Self::Estafeta => 2.8,
            Self::Fedex => 2.2,
            Self::Paquetexpress => 2.9,
            Self::Minutos99 => 1.5,
        }
    }
}

labeled_enum! {
    pub enum PaymentMethod("payment method") {
        CreditCard => "Tarjeta crédito" / "credito",
        DebitCard => "Tarjeta débito" / "debito",
        Transfer => "Transferencia" / "transferencia",
        PayPal => "PayPal" / "paypal",
        Cash => "Efectivo" / "efectivo",
    }
}

labeled_enum! {
    pub enum Segment("segment") {
        Premium => "Premium" / "premium",
        Frequent => "Frecuente" / "frecuente",
        Wholesale => "Mayorista" / "mayorista",
    }
}

labeled_enum! {
    /// Delivery promise band, derived from a record's lead time.
    pub enum Sla("sla") {
        H24 => "24h" / "24h",
        H48 => "48h" / "48h",
        H72 => "72h" / "72h",
    }
}

impl Sla {
    pub fn from_lead_time(days: f64) -> Self {
        if days <= 1.0 {
            Self::H24
        } else if days <= 2.0 {
            Self::H48
        } else {
            Self::H72
        }
    }
}

labeled_enum! {
    pub enum Area("area") {
        Sales => "Ventas" / "ventas",
        Warehouse => "Almacén" / "almacen",
        Administration => "Administración" / "administracion",
    }
}

impl Area {
    /// Fraction of a store's headcount assigned to the area. Sums to 1.
    pub const fn share(self) -> f64 {
        match self {
            Self::Sales => 0.52,
            Self::Warehouse => 0.32,
            Self::Administration => 0.16,
        }
    }

    pub const fn role(self) -> Role {
        match self {
            Self::Sales => Role::Advisor,
            Self::Warehouse => Role::Operator,
            Self::Administration => Role::Analyst,
        }
    }
}

labeled_enum! {
    pub enum Role("role") {
        Advisor => "Asesor" / "asesor",
        Operator => "Operador" / "operador",
        Supervisor => "Supervisor" / "supervisor",
        Analyst => "Analista" / "analista",
    }
}

labeled_enum! {
    pub enum Shift("shift") {
        Morning => "Mañana" / "manana",
        Afternoon => "Tarde" / "tarde",
        Night => "Nocturno" / "nocturno",
    }
}

labeled_enum! {
    pub enum Contract("contract") {
        Permanent => "Base" / "base",
        Temporary => "Temporal" / "temporal",
    }
}

labeled_enum! {
    pub enum Tenure("tenure") {
        UnderOneYear => "0-1" / "0-1",
        OneToThree => "1-3" / "1-3",
        ThreeToFive => "3-5" / "3-5",
        OverFive => "5+" / "5plus",
    }
}
